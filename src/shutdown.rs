use anyhow::Result;
use axum::Extension;
use std::sync::Arc;
use tokio::{
	signal::{
		self,
		unix::{signal, SignalKind},
	},
	sync::Notify,
};

pub type ShutdownExtension = Extension<Shutdown>;

/// Shared handle that stops the server on ctrl-c, SIGTERM or the
/// "terminate" voice command.
#[derive(Clone)]
pub struct Shutdown {
	notify: Arc<Notify>,
}

impl Shutdown {
	pub fn new() -> Result<Self> {
		let notify = Arc::new(Notify::new());
		let mut sigterm = signal(SignalKind::terminate())?;
		let trigger = notify.clone();
		tokio::spawn(async move {
			tokio::select! {
				_ = signal::ctrl_c() => {},
				_ = sigterm.recv() => {},
			}
			trigger.notify_one();
		});

		Ok(Self { notify })
	}

	pub fn extension(&self) -> ShutdownExtension {
		Extension(self.clone())
	}

	/// Ask the server to stop. A trigger fired before the server awaits the
	/// handle is not lost; `notify_one` stores the permit.
	pub fn trigger(&self) {
		self.notify.notify_one();
	}

	pub async fn handle(self) {
		self.notify.notified().await;
		tracing::info!("Terminating...");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn trigger_resolves_handle() {
		let shutdown = Shutdown::new().unwrap();
		shutdown.trigger();
		shutdown.handle().await;
	}
}
