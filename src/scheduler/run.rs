//! Day-by-day scheduling run.
//!
//! A `ScheduleRun` owns the working set for one run. Each simulated day it
//! recomputes priorities against that day's budget, builds a fresh max-priority
//! queue of arena indices, hands out hours one at a time, then erodes every
//! remaining deadline by one day.
//!
//! Storage and calendar failures are logged and collected as `RunWarning`s;
//! nothing inside the loop aborts the run.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::{debug, info, warn};

use crate::calendar::CalendarSink;
use crate::domain::{Allocation, Assignment, DayPlan, Resolution, Resolved, RunWarning, ScheduleSummary};
use crate::error::Result;
use crate::scheduler::budget::StudyBudget;
use crate::scheduler::priority::calculate_priority;
use crate::store::AssignmentRepository;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Assignments remain in the working set
    Running,
    /// Working set is empty
    Done,
}

/// Heap key. Ordering: priority first, then earlier insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    priority: i32,
    seq: Reverse<u64>,
    index: usize,
}

/// Max-priority queue rebuilt every day. Holds arena indices only.
#[derive(Debug, Default)]
struct DayQueue {
    heap: BinaryHeap<QueueEntry>,
    next_seq: u64,
}

impl DayQueue {
    fn push(&mut self, priority: i32, index: usize) {
        let seq = Reverse(self.next_seq);
        self.next_seq += 1;
        self.heap.push(QueueEntry { priority, seq, index });
    }

    fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|entry| entry.index)
    }
}

/// A single scheduling run over an owned set of assignments.
pub struct ScheduleRun<'a> {
    budget: StudyBudget,
    /// Every assignment handed to the run, resolved or not
    arena: Vec<Assignment>,
    /// Indices into `arena` still being scheduled, in arrival order
    live: Vec<usize>,
    /// Next day to simulate (starts at 1)
    day: u32,
    repo: &'a mut dyn AssignmentRepository,
    calendar: &'a mut dyn CalendarSink,
    summary: ScheduleSummary,
}

impl<'a> ScheduleRun<'a> {
    /// Start a run. Assignments that are already finished or already overdue
    /// are resolved immediately and never receive hours.
    pub fn new(
        assignments: Vec<Assignment>,
        budget: StudyBudget,
        repo: &'a mut dyn AssignmentRepository,
        calendar: &'a mut dyn CalendarSink,
    ) -> Self {
        let mut run = Self {
            budget,
            arena: assignments,
            live: Vec::new(),
            day: 1,
            repo,
            calendar,
            summary: ScheduleSummary::default(),
        };

        for index in 0..run.arena.len() {
            let resolution = if run.arena[index].is_complete() {
                Some(Resolution::Completed)
            } else if run.arena[index].is_overdue() {
                Some(Resolution::Missed)
            } else {
                None
            };

            match resolution {
                Some(resolution) => {
                    let resolved = run.resolve(index, resolution, 0);
                    debug!("'{}' resolved before day 1: {:?}", resolved.name, resolution);
                    run.summary.preresolved.push(resolved);
                    run.forget(index);
                }
                None => run.live.push(index),
            }
        }

        info!(
            "Schedule run started: {} assignments ({} to schedule), budget {}h weekday / {}h weekend",
            run.arena.len(),
            run.live.len(),
            budget.weekday_hours,
            budget.weekend_hours
        );
        run
    }

    pub fn state(&self) -> RunState {
        if self.live.is_empty() {
            RunState::Done
        } else {
            RunState::Running
        }
    }

    /// The next day `step_day` will simulate.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Assignments still being scheduled, in arrival order.
    pub fn working_set(&self) -> impl Iterator<Item = &Assignment> {
        self.live.iter().map(|&index| &self.arena[index])
    }

    /// Simulate one day. Returns `None` once the run is done.
    pub fn step_day(&mut self) -> Option<&DayPlan> {
        if self.state() == RunState::Done {
            return None;
        }

        let day = self.day;
        let budget = self.budget.hours_for_day(day);
        let hours = i32::try_from(budget).unwrap_or(i32::MAX);
        let mut plan = DayPlan {
            day,
            budget,
            allocations: Vec::new(),
            completed: Vec::new(),
            missed: Vec::new(),
        };

        let mut queue = DayQueue::default();
        for &index in &self.live {
            let assignment = &mut self.arena[index];
            assignment.priority = calculate_priority(assignment, hours);
            queue.push(assignment.priority, index);
        }

        for hour in 0..budget {
            let Some(index) = queue.pop() else {
                break;
            };

            let allocation = Allocation {
                assignment_id: self.arena[index].id,
                title: self.arena[index].name.clone(),
                day_offset: day - 1,
                hour,
            };
            debug!("Day {} hour {}: {}", day, hour + 1, allocation.title);
            self.export(&allocation);
            plan.allocations.push(allocation);

            self.arena[index].decrease_duration(1);
            if self.arena[index].is_complete() {
                self.live.retain(|&i| i != index);
                plan.completed.push(self.resolve(index, Resolution::Completed, day));
                self.forget(index);
            } else {
                self.persist_remaining(index);
                let assignment = &mut self.arena[index];
                assignment.priority = calculate_priority(assignment, hours);
                queue.push(assignment.priority, index);
            }
        }

        let mut remaining = Vec::with_capacity(self.live.len());
        for index in std::mem::take(&mut self.live) {
            self.arena[index].decrease_deadline(1);
            if self.arena[index].is_overdue() {
                let resolved = self.resolve(index, Resolution::Missed, day);
                info!("Missed deadline for assignment: {}", resolved.name);
                plan.missed.push(resolved);
                self.forget(index);
            } else {
                remaining.push(index);
            }
        }
        self.live = remaining;
        self.day += 1;

        self.summary.days.push(plan);
        self.summary.days.last()
    }

    /// Run every remaining day and return the summary.
    pub fn run_to_completion(mut self) -> ScheduleSummary {
        while self.step_day().is_some() {}
        self.finish()
    }

    /// Stop here and return what has been produced so far.
    pub fn finish(self) -> ScheduleSummary {
        info!(
            "Schedule run finished after {} days: {} hours allocated, {} completed, {} missed, {} warnings",
            self.summary.days.len(),
            self.summary.total_hours(),
            self.summary.completed().count(),
            self.summary.missed().count(),
            self.summary.warnings.len()
        );
        self.summary
    }

    fn resolve(&self, index: usize, resolution: Resolution, day: u32) -> Resolved {
        let assignment = &self.arena[index];
        Resolved {
            assignment_id: assignment.id,
            name: assignment.name.clone(),
            resolution,
            day,
            remaining: assignment.real_duration,
        }
    }

    fn export(&mut self, allocation: &Allocation) {
        if let Err(e) = self.calendar.add_event(allocation) {
            warn!("Calendar export failed for '{}': {}", allocation.title, e);
            self.summary.warnings.push(RunWarning::CalendarWrite {
                title: allocation.title.clone(),
                day_offset: allocation.day_offset,
                hour: allocation.hour,
                message: e.to_string(),
            });
        }
    }

    fn persist_remaining(&mut self, index: usize) {
        let assignment = &self.arena[index];
        if !assignment.is_persisted() {
            return;
        }
        let (id, remaining) = (assignment.id, assignment.real_duration);
        if let Err(e) = self.repo.update_remaining_effort(id, remaining) {
            warn!("Failed to update remaining effort for assignment {}: {}", id, e);
            self.summary.warnings.push(RunWarning::StorageUpdate {
                id,
                remaining,
                message: e.to_string(),
            });
        }
    }

    /// Delete a resolved assignment from storage.
    fn forget(&mut self, index: usize) {
        let assignment = &self.arena[index];
        if !assignment.is_persisted() {
            return;
        }
        let id = assignment.id;
        if let Err(e) = self.repo.delete(id) {
            warn!("Failed to delete assignment {}: {}", id, e);
            self.summary.warnings.push(RunWarning::StorageDelete {
                id,
                message: e.to_string(),
            });
        }
    }
}

/// Entry point for scheduling runs with a fixed budget.
#[derive(Debug, Clone, Copy)]
pub struct Planner {
    budget: StudyBudget,
}

impl Planner {
    pub fn new(budget: StudyBudget) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> StudyBudget {
        self.budget
    }

    /// Schedule the given assignments to completion.
    pub fn run(
        &self,
        assignments: Vec<Assignment>,
        repo: &mut dyn AssignmentRepository,
        calendar: &mut dyn CalendarSink,
    ) -> ScheduleSummary {
        ScheduleRun::new(assignments, self.budget, repo, calendar).run_to_completion()
    }

    /// Load every assignment from the repository, then schedule them.
    ///
    /// Only the initial load can fail; per-hour storage failures end up as
    /// warnings in the summary.
    pub fn run_from_store(
        &self,
        repo: &mut dyn AssignmentRepository,
        calendar: &mut dyn CalendarSink,
    ) -> Result<ScheduleSummary> {
        let assignments = repo.load_all()?;
        if assignments.is_empty() {
            info!("No assignments to schedule");
        }
        Ok(self.run(assignments, repo, calendar))
    }
}
