//=========================================================================
// Errors
//=========================================================================

use thiserror::Error;

use crate::config::ConfigError;
use crate::core::platform_bridge::PlatformError;
use crate::core::scoring::ScoreLogError;

/// Everything that can stop the arcade host from running.
#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    ScoreLog(#[from] ScoreLogError),

    #[error("failed to spawn logic thread: {0}")]
    Thread(#[source] std::io::Error),

    #[error("logic thread panicked")]
    LogicPanicked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_sources_transparently() {
        let err: ArcadeError = ConfigError::Invalid("tps must be positive".into()).into();
        assert_eq!(err.to_string(), "invalid config value: tps must be positive");

        let err: ArcadeError = PlatformError::EventLoopCreation("no display".into()).into();
        assert!(matches!(err, ArcadeError::Platform(_)));
    }
}
