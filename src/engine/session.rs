//! Session lifecycle: landmark source acquisition, cancellation and heartbeat.

use crate::gesture::HandFrame;
use crate::source::{LandmarkSource, SourceError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Cancellation flag shared by everything belonging to one session.
///
/// Each session gets a new generation number, so work started by an earlier
/// session can be told apart even after a restart.
#[derive(Debug, Clone)]
pub struct SessionToken {
    active: Arc<AtomicBool>,
    generation: u64,
}

impl SessionToken {
    pub fn new(generation: u64) -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
            generation,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.active.store(false, Ordering::Release);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// External collaborator told that the session is still alive.
pub trait KeepAlive: Send + Sync {
    fn beat(&self);
    fn session_ended(&self);
}

/// Keep-alive that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogKeepAlive;

impl KeepAlive for LogKeepAlive {
    fn beat(&self) {
        log::debug!("Session heartbeat");
    }

    fn session_ended(&self) {
        log::debug!("Session ended");
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to acquire landmark source: {0}")]
    Source(#[from] SourceError),
}

/// Owns the landmark source and heartbeat for a run of sessions.
pub struct Session {
    source: Box<dyn LandmarkSource>,
    keep_alive: Arc<dyn KeepAlive>,
    heartbeat_period: Duration,
    token: Option<SessionToken>,
    heartbeat: Option<JoinHandle<()>>,
    generation: u64,
}

impl Session {
    pub fn new(
        source: Box<dyn LandmarkSource>,
        keep_alive: Arc<dyn KeepAlive>,
        heartbeat_period: Duration,
    ) -> Self {
        Self {
            source,
            keep_alive,
            heartbeat_period,
            token: None,
            heartbeat: None,
            generation: 0,
        }
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.token.as_ref().is_some_and(SessionToken::is_active)
    }

    /// Starts the source and heartbeat under a fresh token.
    ///
    /// Starting an active session returns its current token. If the source
    /// cannot be acquired the session stays stopped and may be retried.
    pub async fn start(
        &mut self,
        frames: mpsc::Sender<Vec<HandFrame>>,
    ) -> Result<SessionToken, SessionError> {
        if let Some(token) = self.token.as_ref().filter(|t| t.is_active()) {
            log::debug!("Session {} already running", token.generation());
            return Ok(token.clone());
        }
        // A token cancelled from elsewhere still owns a source and heartbeat
        self.stop().await;

        self.generation += 1;
        let token = SessionToken::new(self.generation);

        if let Err(e) = self.source.start(frames, token.clone()).await {
            token.cancel();
            log::error!("Failed to start session {}: {}", self.generation, e);
            return Err(e.into());
        }

        self.heartbeat = Some(spawn_heartbeat(
            self.heartbeat_period,
            self.keep_alive.clone(),
            token.clone(),
        ));
        self.token = Some(token.clone());
        log::info!("Session {} started", token.generation());
        Ok(token)
    }

    /// Cancels the token, releases the source and ends the heartbeat.
    /// Stopping a stopped session does nothing.
    pub async fn stop(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };
        token.cancel();
        self.source.stop().await;
        if let Some(heartbeat) = self.heartbeat.take() {
            heartbeat.abort();
        }
        self.keep_alive.session_ended();
        log::info!("Session {} stopped", token.generation());
    }
}

fn spawn_heartbeat(
    period: Duration,
    keep_alive: Arc<dyn KeepAlive>,
    token: SessionToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            if !token.is_active() {
                break;
            }
            keep_alive.beat();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockSource {
        fail: bool,
        starts: Arc<Mutex<usize>>,
        stops: Arc<Mutex<usize>>,
        tokens: Arc<Mutex<Vec<SessionToken>>>,
    }

    #[async_trait]
    impl LandmarkSource for MockSource {
        async fn start(
            &mut self,
            _frames: mpsc::Sender<Vec<HandFrame>>,
            token: SessionToken,
        ) -> Result<(), SourceError> {
            *self.starts.lock().unwrap() += 1;
            if self.fail {
                return Err(SourceError::Unavailable("no camera".to_string()));
            }
            self.tokens.lock().unwrap().push(token);
            Ok(())
        }

        async fn stop(&mut self) {
            *self.stops.lock().unwrap() += 1;
        }
    }

    #[derive(Default)]
    struct MockKeepAlive {
        beats: Mutex<usize>,
        ended: Mutex<usize>,
    }

    impl KeepAlive for MockKeepAlive {
        fn beat(&self) {
            *self.beats.lock().unwrap() += 1;
        }

        fn session_ended(&self) {
            *self.ended.lock().unwrap() += 1;
        }
    }

    fn session(source: MockSource, keep_alive: Arc<MockKeepAlive>) -> Session {
        Session::new(Box::new(source), keep_alive, Duration::from_secs(5))
    }

    #[test]
    fn tokens_share_the_flag() {
        let token = SessionToken::new(7);
        let clone = token.clone();
        assert!(clone.is_active());
        token.cancel();
        assert!(!clone.is_active());
        assert_eq!(clone.generation(), 7);
    }

    #[tokio::test]
    async fn start_and_stop_drive_source_and_keep_alive() {
        let source = MockSource::default();
        let keep_alive = Arc::new(MockKeepAlive::default());
        let mut session = session(source.clone(), keep_alive.clone());
        let (tx, _rx) = mpsc::channel(1);

        let token = session.start(tx).await.unwrap();
        assert!(session.is_active());
        assert_eq!(token.generation(), 1);

        session.stop().await;
        assert!(!session.is_active());
        assert!(!token.is_active());
        assert_eq!(*source.stops.lock().unwrap(), 1);
        assert_eq!(*keep_alive.ended.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_safe_before_start() {
        let source = MockSource::default();
        let keep_alive = Arc::new(MockKeepAlive::default());
        let mut session = session(source.clone(), keep_alive.clone());

        session.stop().await;
        let (tx, _rx) = mpsc::channel(1);
        session.start(tx).await.unwrap();
        session.stop().await;
        session.stop().await;

        assert_eq!(*source.stops.lock().unwrap(), 1);
        assert_eq!(*keep_alive.ended.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn source_failure_leaves_session_stopped_and_retryable() {
        let source = MockSource {
            fail: true,
            ..Default::default()
        };
        let keep_alive = Arc::new(MockKeepAlive::default());
        let mut session = session(source.clone(), keep_alive.clone());

        let (tx, _rx) = mpsc::channel(1);
        let err = session.start(tx.clone()).await.unwrap_err();
        assert!(matches!(err, SessionError::Source(_)));
        assert!(!session.is_active());

        session.start(tx).await.unwrap_err();
        assert_eq!(*source.starts.lock().unwrap(), 2);
        assert_eq!(*keep_alive.ended.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn restart_uses_a_new_generation() {
        let source = MockSource::default();
        let mut session = session(source.clone(), Arc::new(MockKeepAlive::default()));
        let (tx, _rx) = mpsc::channel(1);

        let first = session.start(tx.clone()).await.unwrap();
        let again = session.start(tx.clone()).await.unwrap();
        assert_eq!(again.generation(), first.generation());
        assert_eq!(*source.starts.lock().unwrap(), 1);

        session.stop().await;
        let second = session.start(tx).await.unwrap();
        assert_eq!(second.generation(), first.generation() + 1);
        assert!(!first.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn heartbeat_beats_until_stopped() {
        let keep_alive = Arc::new(MockKeepAlive::default());
        let mut session = session(MockSource::default(), keep_alive.clone());
        let (tx, _rx) = mpsc::channel(1);
        session.start(tx).await.unwrap();

        time::sleep(Duration::from_secs(11)).await;
        assert_eq!(*keep_alive.beats.lock().unwrap(), 2);

        session.stop().await;
        time::sleep(Duration::from_secs(20)).await;
        assert_eq!(*keep_alive.beats.lock().unwrap(), 2);
    }
}
