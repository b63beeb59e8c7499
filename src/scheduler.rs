// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Work distribution.
//!
//! The raster is cut into a fixed number of vertical strips, each
//! spanning the full height.  Workers pull strips rather than being
//! handed them: a shared cursor is fetched-and-incremented, and the
//! value fetched is the strip the worker now owns.  Cost per strip
//! varies a great deal (strips crossing the boundary of the set are
//! expensive), and pulling lets fast workers take up the slack.
//!
//! Both counters belong to a single render job and live only as long
//! as it does.

use crossbeam::atomic::AtomicCell;
use crossbeam::thread::ScopedJoinHandle;
use log::{debug, trace};
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::RenderError;
use crate::raster::StripRows;

/// The number of strips a raster is cut into.
pub const STRIP_COUNT: usize = 100;

/// A range of columns `[x0, x1)` spanning every row of the raster.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WorkUnit {
    /// Position of the strip, left to right.
    pub index: usize,
    /// First column.
    pub x0: usize,
    /// One past the last column.
    pub x1: usize,
}

impl WorkUnit {
    /// A single unit covering the whole raster.
    pub fn whole(width: usize) -> Self {
        WorkUnit {
            index: 0,
            x0: 0,
            x1: width,
        }
    }

    /// Number of columns in the strip.  May be zero for rasters
    /// narrower than the strip count.
    pub fn width(&self) -> usize {
        self.x1 - self.x0
    }

    /// The columns covered.
    pub fn columns(&self) -> Range<usize> {
        self.x0..self.x1
    }
}

/// Cuts `width` columns into `STRIP_COUNT` strips.
pub fn partition(width: usize) -> Vec<WorkUnit> {
    partition_into(width, STRIP_COUNT)
}

/// Cuts `width` columns into `count` strips.  Strip `i` starts at
/// column `i * width / count`, so the strips tile the width exactly.
pub fn partition_into(width: usize, count: usize) -> Vec<WorkUnit> {
    (0..count)
        .map(|index| WorkUnit {
            index,
            x0: index * width / count,
            x1: (index + 1) * width / count,
        })
        .collect()
}

/// The number of hardware threads, never less than one.
pub fn available_threads() -> usize {
    num_cpus::get().max(1)
}

/// The two counters shared between the workers of one render.
#[derive(Debug)]
pub struct StripScheduler {
    next: AtomicUsize,
    done: AtomicUsize,
    total: usize,
}

impl StripScheduler {
    /// A scheduler for `total` strips, none claimed.
    pub fn new(total: usize) -> Self {
        StripScheduler {
            next: AtomicUsize::new(0),
            done: AtomicUsize::new(0),
            total,
        }
    }

    /// Claims the next unclaimed strip, if any remain.  The first
    /// caller to fetch an index owns it; no index is handed out twice.
    pub fn claim(&self) -> Option<usize> {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        if index < self.total {
            Some(index)
        } else {
            None
        }
    }

    /// Records a finished strip and returns the percentage of strips
    /// finished so far.
    pub fn complete(&self) -> usize {
        let done = self.done.fetch_add(1, Ordering::AcqRel) + 1;
        done * 100 / self.total
    }

    /// Strips finished so far.
    pub fn completed(&self) -> usize {
        self.done.load(Ordering::Acquire)
    }
}

/// Computes every strip with `threads` scoped workers, calling `work`
/// once per strip with that strip's rows, and `progress` with the
/// percentage complete after each one.  Each strip's rows move to the
/// worker that claims its index; nothing is locked.  All workers are
/// joined before this returns.  A panicking worker fails the whole
/// render.
pub fn run<W, P>(
    units: &[WorkUnit],
    strips: Vec<StripRows<'_>>,
    threads: usize,
    work: W,
    progress: P,
) -> Result<(), RenderError>
where
    W: Fn(&WorkUnit, &mut StripRows<'_>) + Sync,
    P: Fn(usize) + Sync,
{
    assert_eq!(units.len(), strips.len());
    let threads = threads.max(1);
    let scheduler = StripScheduler::new(units.len());
    let strips: Vec<AtomicCell<Option<StripRows<'_>>>> =
        strips.into_iter().map(|rows| AtomicCell::new(Some(rows))).collect();
    let (scheduler, strips, work, progress) = (&scheduler, &strips, &work, &progress);

    crossbeam::scope(|spawner| {
        let handles: Vec<ScopedJoinHandle<usize>> = (0..threads)
            .map(|worker| {
                spawner.spawn(move |_| {
                    let mut claimed = 0;
                    while let Some(index) = scheduler.claim() {
                        trace!("worker {} claimed strip {}", worker, index);
                        // The cursor hands each index out once, so the cell is always full.
                        let mut rows = match strips[index].take() {
                            Some(rows) => rows,
                            None => continue,
                        };
                        work(&units[index], &mut rows);
                        claimed += 1;
                        progress(scheduler.complete());
                    }
                    debug!("worker {} finished after {} strips", worker, claimed);
                    claimed
                })
            })
            .collect();

        handles.into_iter().map(|handle| handle.join()).collect::<Result<Vec<usize>, _>>()
    })
    .map_err(|_| RenderError::WorkerPanicked)?
    .map_err(|_| RenderError::WorkerPanicked)?;

    debug_assert_eq!(scheduler.completed(), units.len());
    Ok(())
}
