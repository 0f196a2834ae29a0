use std::sync::Arc;

use binboard_core::service::BinboardService;
use chrono::Utc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::app::{Job, Message};

/// Run each job on its own task; results come back over `sender`.
pub(crate) fn dispatch(
    jobs: Vec<Job>,
    service: &Arc<BinboardService>,
    sender: &UnboundedSender<Message>,
) {
    for job in jobs {
        let service = Arc::clone(service);
        let sender = sender.clone();
        tokio::spawn(async move {
            let message = run(job, &service).await;
            if sender.send(message).is_err() {
                debug!("ui loop closed before the job finished");
            }
        });
    }
}

async fn run(job: Job, service: &BinboardService) -> Message {
    match job {
        Job::Dashboard(generation) => {
            Message::Dashboard(generation, service.dashboard(Utc::now()).await)
        }
        Job::BinsAndZones(generation) => {
            Message::BinsAndZones(generation, service.bins_and_zones().await)
        }
        Job::BinDetails(generation, bin) => {
            let result = service.bin_details(bin.bin_id).await;
            Message::BinDetails(generation, bin, result)
        }
        Job::Routes(generation) => Message::Routes(generation, service.routes().await),
        Job::RoutePickups(generation, route_id) => {
            Message::RoutePickups(generation, service.route_pickups(route_id).await)
        }
        Job::Overview(generation) => {
            Message::Overview(generation, service.complaints_overview().await)
        }
        Job::Table(generation, resource) => {
            Message::Table(generation, resource, service.table(resource).await)
        }
        Job::SubmitComplaint(form) => {
            Message::ComplaintSubmitted(service.submit_complaint(&form).await)
        }
        Job::SubmitTicket(form) => Message::TicketSubmitted(service.submit_ticket(&form).await),
    }
}
