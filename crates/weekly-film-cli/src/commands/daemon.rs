use crate::commands::load_settings;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};
use uuid::Uuid;
use weekly_film_config::{Config, PathManager, SchedulerConfig};
use weekly_film_core::FilmBoard;
use weekly_film_sources::create_feed;

/// Owns the two repeating jobs: the feed refresh and the rotation tick.
pub struct Scheduler {
    scheduler: JobScheduler,
    board: FilmBoard,
    config: SchedulerConfig,
    output: Output,
    rotation_job: Option<Uuid>,
}

impl Scheduler {
    pub async fn new(board: FilmBoard, config: SchedulerConfig, output: Output) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler,
            board,
            config,
            output,
            rotation_job: None,
        })
    }

    pub async fn start(&mut self) -> Result<()> {
        if self.config.run_on_startup {
            info!(operation = "scheduler_startup", "Running initial refresh on startup");
            refresh_tick(&self.board, &self.output).await;
        }

        let refresh_job = refresh_job(self.board.clone(), self.output, self.config.refresh_interval())?;
        self.scheduler.add(refresh_job).await?;
        self.schedule_rotation().await?;
        self.scheduler.start().await?;

        info!(
            operation = "scheduler_started",
            refresh_interval_secs = self.config.refresh_interval_seconds,
            scroll_interval_secs = self.config.scroll_interval_seconds,
            "Scheduler started"
        );
        Ok(())
    }

    /// Replace the rotation job with one on `interval`, ticking once now.
    pub async fn reschedule_rotation(&mut self, interval: Duration) -> Result<()> {
        if let Some(job_id) = self.rotation_job.take() {
            self.scheduler.remove(&job_id).await?;
        }
        self.config.scroll_interval_seconds = interval.as_secs();
        self.schedule_rotation().await?;

        info!(
            operation = "rotation_rescheduled",
            scroll_interval_secs = self.config.scroll_interval_seconds,
            "Rotation interval updated"
        );
        Ok(())
    }

    /// Re-read the config file and apply a changed rotation interval.
    pub async fn reload(&mut self, config_file: &Path) -> Result<()> {
        let config = Config::load_or_default(config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Configuration validation failed: {}", e))?;

        if config.scheduler.refresh_interval_seconds != self.config.refresh_interval_seconds {
            warn!(
                operation = "config_reload",
                refresh_interval_secs = config.scheduler.refresh_interval_seconds,
                "Refresh interval changes take effect on restart"
            );
        }
        self.reschedule_rotation(config.scheduler.scroll_interval()).await
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.scheduler.shutdown().await?;
        info!(operation = "scheduler_stopped", "Scheduler stopped");
        Ok(())
    }

    async fn schedule_rotation(&mut self) -> Result<()> {
        rotation_tick(&self.board, &self.output).await;
        let job = rotation_job(self.board.clone(), self.output, self.config.scroll_interval())?;
        self.rotation_job = Some(self.scheduler.add(job).await?);
        Ok(())
    }
}

fn refresh_job(board: FilmBoard, output: Output, interval: Duration) -> Result<Job> {
    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let board = board.clone();
        Box::pin(async move {
            refresh_tick(&board, &output).await;
        })
    })?;
    Ok(job)
}

fn rotation_job(board: FilmBoard, output: Output, interval: Duration) -> Result<Job> {
    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let board = board.clone();
        Box::pin(async move {
            rotation_tick(&board, &output).await;
        })
    })?;
    Ok(job)
}

/// One refresh cycle. Failures keep the cached films and only flip availability.
async fn refresh_tick(board: &FilmBoard, output: &Output) {
    match board.refresher().try_refresh().await {
        None => return,
        Some(Ok(outcome)) => {
            info!(
                operation = "scheduled_refresh_complete",
                films = outcome.film_list.len(),
                update_time = %outcome.update_time,
                "Scheduled refresh completed"
            );
        }
        Some(Err(e)) => {
            error!(
                operation = "scheduled_refresh_error",
                kind = e.kind(),
                error = %e,
                "Scheduled refresh failed, keeping cached films"
            );
        }
    }
    output.sensor(&board.film_data_sensor().await);
}

async fn rotation_tick(board: &FilmBoard, output: &Output) {
    output.sensor(&board.rotate().await);
}

#[cfg(unix)]
async fn wait_for_shutdown(scheduler: &mut Scheduler, config_file: &Path, output: &Output) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                info!(operation = "shutdown_signal", signal = "SIGINT", "Shutting down");
                return Ok(());
            }
            _ = terminate.recv() => {
                info!(operation = "shutdown_signal", signal = "SIGTERM", "Shutting down");
                return Ok(());
            }
            _ = hangup.recv() => {
                info!(operation = "config_reload", "SIGHUP received, reloading configuration");
                if let Err(e) = scheduler.reload(config_file).await {
                    error!(operation = "config_reload_error", error = %e, "Configuration reload failed");
                    output.error(format!("Configuration reload failed: {}", e));
                }
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown(_scheduler: &mut Scheduler, _config_file: &Path, _output: &Output) -> Result<()> {
    tokio::signal::ctrl_c().await?;
    info!(operation = "shutdown_signal", signal = "ctrl_c", "Shutting down");
    Ok(())
}

/// Resolve the effective scheduler settings from the file and CLI flags.
fn effective_scheduler_config(
    file: &SchedulerConfig,
    scroll_interval_override: Option<u64>,
    no_startup_refresh: bool,
) -> Result<SchedulerConfig> {
    let scroll_interval_seconds = scroll_interval_override.unwrap_or(file.scroll_interval_seconds);
    if scroll_interval_seconds == 0 {
        return Err(eyre!("Scroll interval must be at least 1 second"));
    }

    Ok(SchedulerConfig {
        refresh_interval_seconds: file.refresh_interval_seconds,
        scroll_interval_seconds,
        run_on_startup: file.run_on_startup && !no_startup_refresh,
    })
}

pub async fn run_daemon(
    api_key_override: Option<String>,
    scroll_interval_override: Option<u64>,
    no_startup_refresh: bool,
    output: &Output,
) -> Result<()> {
    let path_manager = PathManager::default();
    let (config, credentials) = load_settings(&path_manager)?;

    let feed = create_feed(&config, &credentials, api_key_override)
        .map_err(|e| eyre!("Failed to create film feed: {}", e))?;
    let board = FilmBoard::new(Arc::from(feed));

    let scheduler_config =
        effective_scheduler_config(&config.scheduler, scroll_interval_override, no_startup_refresh)?;

    let mut scheduler = Scheduler::new(board, scheduler_config, *output).await?;
    scheduler.start().await?;
    output.success("WeeklyFilm daemon running (Ctrl-C to stop)");

    wait_for_shutdown(&mut scheduler, &path_manager.config_file(), output).await?;
    scheduler.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_config_uses_file_values() {
        let file = SchedulerConfig::default();
        let config = effective_scheduler_config(&file, None, false).unwrap();
        assert_eq!(config, file);
    }

    #[test]
    fn test_effective_config_overrides() {
        let file = SchedulerConfig::default();
        let config = effective_scheduler_config(&file, Some(15), true).unwrap();
        assert_eq!(config.scroll_interval_seconds, 15);
        assert!(!config.run_on_startup);
        assert_eq!(config.refresh_interval_seconds, file.refresh_interval_seconds);
    }

    #[test]
    fn test_effective_config_rejects_zero_interval() {
        assert!(effective_scheduler_config(&SchedulerConfig::default(), Some(0), false).is_err());
    }
}
