use std::io;

/// Unit of background work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs decode jobs off the caller's thread.
pub trait Spawn {
    fn spawn(&self, job: Job) -> io::Result<()>;
}

/// One named OS thread per job.
#[derive(Debug, Default, Copy, Clone)]
pub struct ThreadSpawner;

impl Spawn for ThreadSpawner {
    fn spawn(&self, job: Job) -> io::Result<()> {
        std::thread::Builder::new()
            .name("cuboid-decode".to_string())
            .spawn(job)
            .map(|_| ())
    }
}

/// Queues jobs until the test runs them, so completion order is explicit.
#[cfg(test)]
#[derive(Default, Clone)]
pub(crate) struct ManualSpawner {
    jobs: std::rc::Rc<std::cell::RefCell<std::collections::VecDeque<Job>>>,
}

#[cfg(test)]
impl ManualSpawner {
    pub(crate) fn pending(&self) -> usize {
        self.jobs.borrow().len()
    }

    /// Runs the oldest queued job. Returns false if none was queued.
    pub(crate) fn run_next(&self) -> bool {
        let job = self.jobs.borrow_mut().pop_front();
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Runs the most recently queued job.
    pub(crate) fn run_last(&self) -> bool {
        let job = self.jobs.borrow_mut().pop_back();
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Drops every queued job without running it.
    pub(crate) fn discard_all(&self) {
        let jobs: Vec<Job> = self.jobs.borrow_mut().drain(..).collect();
        drop(jobs);
    }

    pub(crate) fn run_all(&self) {
        while self.run_next() {}
    }
}

#[cfg(test)]
impl Spawn for ManualSpawner {
    fn spawn(&self, job: Job) -> io::Result<()> {
        self.jobs.borrow_mut().push_back(job);
        Ok(())
    }
}
