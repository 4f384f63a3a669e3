use async_channel::Sender;
use ringctl::proto::Notification;

/// Observes drags on the ring.
pub trait SeekBarChangeListener {
    fn on_progress_changed(&mut self, progress: f64, from_user: bool);

    fn on_start_tracking_touch(&mut self) {}

    fn on_stop_tracking_touch(&mut self) {}
}

/// Observes taps on the inner circle.
pub trait CenterClickListener {
    fn on_center_clicked(&mut self, progress: f64);
}

fn forward(tx: &Sender<Notification>, notification: Notification) {
    if let Err(e) = tx.try_send(notification) {
        log::warn!("Dropping notification: {}", e);
    }
}

impl SeekBarChangeListener for Sender<Notification> {
    fn on_progress_changed(&mut self, progress: f64, from_user: bool) {
        forward(
            self,
            Notification::ProgressChanged {
                progress,
                from_user,
            },
        );
    }

    fn on_start_tracking_touch(&mut self) {
        forward(self, Notification::StartTracking);
    }

    fn on_stop_tracking_touch(&mut self) {
        forward(self, Notification::StopTracking);
    }
}

impl CenterClickListener for Sender<Notification> {
    fn on_center_clicked(&mut self, progress: f64) {
        forward(self, Notification::CenterClicked { progress });
    }
}
