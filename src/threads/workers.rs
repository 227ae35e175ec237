//! Dispatch worker pool and its client handle.
//!
//! Requests travel to the workers over one crossbeam channel. Each job
//! carries its own reply channel and [`CancelTicket`]; the client waits on
//! the reply with `recv_timeout` and raises the ticket when it gives up.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};
use tracing::{debug, info, warn};

use crate::controller::{
    ParameterQueryRequest, ParameterQueryResponse, PipelineController, ProcessPlanningResponse,
    SelectSurfaceRequest, SurfaceDetectionRequest, SurfaceDetectionResponse,
};
use crate::error::{ParikshaError, Result};
use crate::state::CancelTicket;

/// How often idle workers re-check the running flag.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Request accepted by the service.
#[derive(Debug, Clone)]
pub enum ServiceRequest {
    Detect(SurfaceDetectionRequest),
    Select(SelectSurfaceRequest),
    QueryParameters(ParameterQueryRequest),
    ProcessPath,
}

impl ServiceRequest {
    fn timeout(&self) -> Option<Duration> {
        match self {
            ServiceRequest::Detect(req) => req.timeout,
            _ => None,
        }
    }
}

/// Reply to a [`ServiceRequest`].
#[derive(Debug, Clone)]
pub enum ServiceResponse {
    Detect(SurfaceDetectionResponse),
    Select,
    Parameters(ParameterQueryResponse),
    ProcessPath(ProcessPlanningResponse),
}

struct Job {
    request: ServiceRequest,
    reply: Sender<Result<ServiceResponse>>,
    ticket: CancelTicket,
}

/// Fixed set of named worker threads serving requests.
pub struct DispatchPool {
    handles: Vec<JoinHandle<()>>,
}

impl DispatchPool {
    /// Spawn `workers` threads (at least one) and return the pool with a client.
    pub fn spawn(
        controller: Arc<PipelineController>,
        workers: usize,
        default_timeout: Option<Duration>,
        running: Arc<AtomicBool>,
    ) -> Result<(Self, ServiceClient)> {
        let (jobs_tx, jobs_rx) = unbounded::<Job>();
        let count = workers.max(1);
        let mut handles = Vec::with_capacity(count);

        for index in 0..count {
            let controller = Arc::clone(&controller);
            let jobs = jobs_rx.clone();
            let running = Arc::clone(&running);
            let handle = thread::Builder::new()
                .name(format!("dispatch-{}", index))
                .spawn(move || run_worker(index, &controller, &jobs, &running))?;
            handles.push(handle);
        }
        info!("Dispatch pool started with {} workers", count);

        let client = ServiceClient {
            jobs: jobs_tx,
            default_timeout,
        };
        Ok((Self { handles }, client))
    }

    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Wait for all workers to finish.
    pub fn join(self) {
        for handle in self.handles {
            if handle.join().is_err() {
                warn!("Dispatch worker panicked");
            }
        }
    }
}

fn run_worker(
    index: usize,
    controller: &PipelineController,
    jobs: &Receiver<Job>,
    running: &AtomicBool,
) {
    debug!("Dispatch worker {} started", index);

    while running.load(Ordering::Relaxed) {
        let job = match jobs.recv_timeout(IDLE_POLL) {
            Ok(job) => job,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        if job.ticket.is_cancelled() {
            debug!("Worker {}: request abandoned before dispatch", index);
            continue;
        }

        let result = execute(controller, job.request, &job.ticket);
        if job.reply.send(result).is_err() {
            debug!("Worker {}: caller gone, reply dropped", index);
        }
    }

    debug!("Dispatch worker {} stopped", index);
}

fn execute(
    controller: &PipelineController,
    request: ServiceRequest,
    ticket: &CancelTicket,
) -> Result<ServiceResponse> {
    match request {
        ServiceRequest::Detect(req) => controller
            .handle(&req, ticket)
            .map(ServiceResponse::Detect),
        ServiceRequest::Select(req) => controller
            .select_surface(&req)
            .map(|()| ServiceResponse::Select),
        ServiceRequest::QueryParameters(req) => controller
            .blending_parameters(req)
            .map(ServiceResponse::Parameters),
        ServiceRequest::ProcessPath => {
            Ok(ServiceResponse::ProcessPath(controller.process_path()))
        }
    }
}

/// Cloneable handle for submitting requests to the pool.
#[derive(Clone)]
pub struct ServiceClient {
    jobs: Sender<Job>,
    default_timeout: Option<Duration>,
}

impl ServiceClient {
    /// Submit a request and wait for its reply.
    ///
    /// A timed-out detection request yields a response with `timed_out` set;
    /// other timed-out requests fail with [`ParikshaError::ServiceUnavailable`].
    pub fn call(&self, request: ServiceRequest) -> Result<ServiceResponse> {
        let timeout = request.timeout().or(self.default_timeout);
        let is_detect = matches!(request, ServiceRequest::Detect(_));
        let ticket = CancelTicket::new();
        let (reply, reply_rx) = bounded(1);

        self.jobs
            .send(Job {
                request,
                reply,
                ticket: ticket.clone(),
            })
            .map_err(|_| ParikshaError::ServiceUnavailable("dispatch pool stopped".into()))?;

        let Some(timeout) = timeout else {
            return reply_rx
                .recv()
                .map_err(|_| ParikshaError::ServiceUnavailable("worker dropped request".into()))?;
        };

        match reply_rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                ticket.cancel();
                warn!("Request timed out after {:?}", timeout);
                if is_detect {
                    Ok(ServiceResponse::Detect(SurfaceDetectionResponse::timed_out()))
                } else {
                    Err(ParikshaError::ServiceUnavailable(format!(
                        "request timed out after {:?}",
                        timeout
                    )))
                }
            }
            Err(RecvTimeoutError::Disconnected) => Err(ParikshaError::ServiceUnavailable(
                "worker dropped request".into(),
            )),
        }
    }

    /// Surface detection service.
    pub fn detect(&self, request: SurfaceDetectionRequest) -> Result<SurfaceDetectionResponse> {
        match self.call(ServiceRequest::Detect(request))? {
            ServiceResponse::Detect(resp) => Ok(resp),
            other => Err(unexpected(other)),
        }
    }

    /// Selection service.
    pub fn select(&self, request: SelectSurfaceRequest) -> Result<()> {
        match self.call(ServiceRequest::Select(request))? {
            ServiceResponse::Select => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    /// Blending parameter query service.
    pub fn blending_parameters(
        &self,
        request: ParameterQueryRequest,
    ) -> Result<ParameterQueryResponse> {
        match self.call(ServiceRequest::QueryParameters(request))? {
            ServiceResponse::Parameters(resp) => Ok(resp),
            other => Err(unexpected(other)),
        }
    }

    /// Process path planning service.
    pub fn process_path(&self) -> Result<ProcessPlanningResponse> {
        match self.call(ServiceRequest::ProcessPath)? {
            ServiceResponse::ProcessPath(resp) => Ok(resp),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(response: ServiceResponse) -> ParikshaError {
    ParikshaError::ServiceUnavailable(format!("mismatched reply: {:?}", response))
}
