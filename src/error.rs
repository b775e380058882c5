//! Driver Error Types
//!
//! 드라이버 에러 정의

use std::io;
use thiserror::Error;

// ============================================================================
// DriverError - 드라이버 에러
// ============================================================================

/// 드라이버 에러
#[derive(Error, Debug)]
pub enum DriverError {
    /// 닫힌 연결에 대한 명령 전송
    #[error("Connection is closed")]
    ConnectionClosed,

    /// 잘못된 인자
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 연결 에러
    #[error("Connection error: {0}")]
    Connection(String),

    /// 프로토콜 에러 (예상치 못한 응답 형태)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// 타임아웃 에러
    #[error("Timeout: {0}")]
    Timeout(String),

    /// 서비스 불가
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// I/O 에러
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DriverError {
    /// 잘못된 인자 에러 생성
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// 연결 에러 생성
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// 프로토콜 에러 생성
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// 타임아웃 에러 생성
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// 서비스 불가 에러 생성
    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    /// 클라이언트 측 에러 여부
    ///
    /// 전송 계층까지 가지 않고 라우팅 계층에서 동기적으로 발생한 에러입니다.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ConnectionClosed | Self::InvalidArgument(_))
    }

    /// 재시도 가능 여부
    ///
    /// 이 계층은 재시도하지 않습니다. 전송 콜라보레이터의 판단 자료로만 사용됩니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Timeout(_) | Self::ServiceUnavailable(_)
        )
    }
}

// ============================================================================
// Result Type
// ============================================================================

/// 드라이버 결과 타입
pub type DriverResult<T> = Result<T, DriverError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_display() {
        let err = DriverError::ConnectionClosed;
        assert_eq!(err.to_string(), "Connection is closed");

        let err = DriverError::invalid_argument("Keys must not be empty");
        assert_eq!(err.to_string(), "Invalid argument: Keys must not be empty");

        let err = DriverError::timeout("Command timed out");
        assert_eq!(err.to_string(), "Timeout: Command timed out");
    }

    #[test]
    fn test_driver_error_client_error() {
        assert!(DriverError::ConnectionClosed.is_client_error());
        assert!(DriverError::invalid_argument("absent").is_client_error());
        assert!(!DriverError::connection("refused").is_client_error());
    }

    #[test]
    fn test_driver_error_retryable() {
        assert!(DriverError::connection("refused").is_retryable());
        assert!(DriverError::timeout("elapsed").is_retryable());
        assert!(DriverError::service_unavailable("no replica").is_retryable());

        // 라우팅 계층의 동기 에러는 재시도 대상이 아님
        assert!(!DriverError::ConnectionClosed.is_retryable());
        assert!(!DriverError::invalid_argument("absent").is_retryable());
    }

    #[test]
    fn test_driver_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe");
        let err: DriverError = io_err.into();
        assert!(matches!(err, DriverError::Io(_)));
    }
}
