//! Immersive session lifecycle, modeled as an explicit state machine.
//!
//! Session negotiation is asynchronous and host-driven: the machine only
//! records transitions triggered by external events (a request being
//! granted, the runtime ending the session). While a session is active it
//! exposes a [`PoseProvider`], and the frame loop uses that provider's view
//! matrix in place of the one derived from the desktop camera. No XR
//! runtime is bound here; a backend plugs in by supplying the provider.

use glam::Mat4;

/// Supplies a head-pose view matrix while an immersive session is active.
pub trait PoseProvider {
    /// World-to-view transform for the current head pose, in the same
    /// convention as `Camera::view_matrix`.
    fn view_matrix(&self) -> Mat4;
}

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No session requested.
    Idle,
    /// Request in flight; outcome arrives as `granted` or `denied`.
    Requesting,
    /// Session running; a pose provider is available.
    Active,
    /// Session ended normally; a new request may follow.
    Ended,
    /// Request or session failed; a new request may follow.
    Failed,
}

/// A transition that is not legal from the current state.
#[derive(Debug, thiserror::Error)]
#[error("cannot {event} while session is {from:?}")]
pub struct TransitionError {
    from: SessionState,
    event: &'static str,
}

/// The immersive session state machine.
pub struct XrSession {
    state: SessionState,
    provider: Option<Box<dyn PoseProvider>>,
}

impl Default for XrSession {
    fn default() -> Self {
        Self::new()
    }
}

impl XrSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            provider: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The active session's pose provider, if any.
    pub fn pose_provider(&self) -> Option<&dyn PoseProvider> {
        match self.state {
            SessionState::Active => self.provider.as_deref(),
            _ => None,
        }
    }

    /// Begin session negotiation. Legal from `Idle`, or again after a
    /// session ended or failed.
    pub fn request(&mut self) -> Result<(), TransitionError> {
        match self.state {
            SessionState::Idle | SessionState::Ended | SessionState::Failed => {
                self.state = SessionState::Requesting;
                log::info!("immersive session requested");
                Ok(())
            }
            from => Err(TransitionError {
                from,
                event: "request",
            }),
        }
    }

    /// The host granted the request: the session becomes active with the
    /// given pose provider.
    pub fn granted(&mut self, provider: Box<dyn PoseProvider>) -> Result<(), TransitionError> {
        match self.state {
            SessionState::Requesting => {
                self.state = SessionState::Active;
                self.provider = Some(provider);
                log::info!("immersive session active");
                Ok(())
            }
            from => Err(TransitionError {
                from,
                event: "grant",
            }),
        }
    }

    /// The host denied the request.
    pub fn denied(&mut self, reason: &str) -> Result<(), TransitionError> {
        match self.state {
            SessionState::Requesting => {
                self.state = SessionState::Failed;
                log::warn!("immersive session denied: {reason}");
                Ok(())
            }
            from => Err(TransitionError {
                from,
                event: "deny",
            }),
        }
    }

    /// The session ended, by user exit or by the runtime.
    pub fn ended(&mut self) -> Result<(), TransitionError> {
        match self.state {
            SessionState::Active => {
                self.state = SessionState::Ended;
                self.provider = None;
                log::info!("immersive session ended");
                Ok(())
            }
            from => Err(TransitionError { from, event: "end" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPose(Mat4);

    impl PoseProvider for FixedPose {
        fn view_matrix(&self) -> Mat4 {
            self.0
        }
    }

    #[test]
    fn full_lifecycle() {
        let mut session = XrSession::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.pose_provider().is_none());

        session.request().unwrap();
        assert_eq!(session.state(), SessionState::Requesting);
        assert!(session.pose_provider().is_none());

        session.granted(Box::new(FixedPose(Mat4::IDENTITY))).unwrap();
        assert_eq!(session.state(), SessionState::Active);
        let pose = session.pose_provider().unwrap();
        assert_eq!(pose.view_matrix(), Mat4::IDENTITY);

        session.ended().unwrap();
        assert_eq!(session.state(), SessionState::Ended);
        assert!(session.pose_provider().is_none());
    }

    #[test]
    fn denied_request_fails_and_can_retry() {
        let mut session = XrSession::new();
        session.request().unwrap();
        session.denied("no headset connected").unwrap();
        assert_eq!(session.state(), SessionState::Failed);

        session.request().unwrap();
        assert_eq!(session.state(), SessionState::Requesting);
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        let mut session = XrSession::new();
        assert!(session.granted(Box::new(FixedPose(Mat4::IDENTITY))).is_err());
        assert!(session.ended().is_err());
        assert!(session.denied("nothing pending").is_err());

        session.request().unwrap();
        assert!(session.request().is_err());
        assert!(session.ended().is_err());
    }

    #[test]
    fn restart_after_end() {
        let mut session = XrSession::new();
        session.request().unwrap();
        session.granted(Box::new(FixedPose(Mat4::IDENTITY))).unwrap();
        session.ended().unwrap();

        session.request().unwrap();
        assert_eq!(session.state(), SessionState::Requesting);
    }
}
