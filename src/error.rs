use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Remote(#[from] crate::remote::RemoteError),

    #[error(transparent)]
    Backend(#[from] crate::backend::BackendError),

    #[error(transparent)]
    Enumerate(#[from] crate::state::EnumerateError),

    #[error(transparent)]
    Middleware(#[from] crate::middleware::MiddlewareError),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("every resource type failed to enumerate")]
    NothingEnumerated,

    #[error("no Terraform state could be read")]
    NoStateRead,

    #[error("run cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::middleware::MiddlewareError;
    use crate::remote::RemoteError;
    use crate::state::EnumerateError;

    #[test]
    fn test_nothing_enumerated_display() {
        assert_eq!(
            ScanError::NothingEnumerated.to_string(),
            "every resource type failed to enumerate"
        );
    }

    #[test]
    fn test_no_state_read_display() {
        assert_eq!(ScanError::NoStateRead.to_string(), "no Terraform state could be read");
    }

    #[test]
    fn test_remote_error_from_conversion() {
        let err: ScanError = RemoteError::Unsupported("openstack+tf".to_string()).into();
        assert!(matches!(err, ScanError::Remote(_)));
        assert_eq!(err.to_string(), "unsupported remote 'openstack+tf'");
    }

    #[test]
    fn test_backend_error_from_conversion() {
        let err: ScanError = BackendError::Unsupported("ftp".to_string()).into();
        assert!(matches!(err, ScanError::Backend(_)));
        assert_eq!(err.to_string(), "Unsupported backend 'ftp'");
    }

    #[test]
    fn test_enumerate_error_from_conversion() {
        let err: ScanError = EnumerateError::NoStateFound {
            path: "bucket/**/*.tfstate".to_string(),
        }
        .into();
        assert!(matches!(err, ScanError::Enumerate(_)));
        assert_eq!(
            err.to_string(),
            "no Terraform state was found in bucket/**/*.tfstate, exiting"
        );
    }

    #[test]
    fn test_middleware_error_from_conversion() {
        let err: ScanError = MiddlewareError::new("normalizer", "bad shape").into();
        assert!(matches!(err, ScanError::Middleware(_)));
        assert!(err.to_string().contains("bad shape"));
    }
}
