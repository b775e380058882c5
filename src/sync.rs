//! Synchronous Command Facade
//!
//! 동기 명령 파사드
//!
//! 연산별로 정적으로 열거된 블로킹 API입니다. 각 연산은 명령을 만들어
//! 핸들러로 디스패치한 뒤, 설정된 타임아웃으로 완료 슬롯을 대기합니다.
//! 리플렉션 기반 인터페이스 구현은 사용하지 않습니다.

use std::time::Duration;

use bytes::Bytes;

use super::command::{Command, Response};
use super::error::{DriverError, DriverResult};
use super::handler::ConnectionHandler;

// ============================================================================
// SyncCommands - 동기 명령 파사드
// ============================================================================

/// 동기 명령 파사드
///
/// 핸들러를 빌려 쓰며, 핸들러의 타임아웃 설정을 따릅니다.
#[derive(Debug)]
pub struct SyncCommands<'a> {
    handler: &'a ConnectionHandler,
}

impl ConnectionHandler {
    /// 동기 명령 파사드 획득
    pub fn sync(&self) -> SyncCommands<'_> {
        SyncCommands { handler: self }
    }
}

impl SyncCommands<'_> {
    /// 디스패치 후 완료까지 블로킹
    fn execute(&self, command: Command) -> DriverResult<Response> {
        let command = self.handler.dispatch(command)?;
        command.output().wait(self.handler.timeout())
    }

    /// PING
    pub fn ping(&self) -> DriverResult<String> {
        match self.execute(Command::ping())? {
            Response::Simple(message) => Ok(message),
            other => Err(unexpected("PING", &other)),
        }
    }

    /// ECHO message
    pub fn echo(&self, message: impl Into<Bytes>) -> DriverResult<Bytes> {
        match self.execute(Command::echo(message))? {
            Response::Value(Some(value)) => Ok(value),
            other => Err(unexpected("ECHO", &other)),
        }
    }

    /// GET key
    pub fn get(&self, key: impl Into<Bytes>) -> DriverResult<Option<Bytes>> {
        match self.execute(Command::get(key))? {
            Response::Value(value) => Ok(value),
            other => Err(unexpected("GET", &other)),
        }
    }

    /// SET key value
    pub fn set(&self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> DriverResult<()> {
        match self.execute(Command::set(key, value))? {
            Response::Ok => Ok(()),
            other => Err(unexpected("SET", &other)),
        }
    }

    /// GETSET key value - 이전 값 반환
    pub fn getset(
        &self,
        key: impl Into<Bytes>,
        value: impl Into<Bytes>,
    ) -> DriverResult<Option<Bytes>> {
        match self.execute(Command::getset(key, value))? {
            Response::Value(previous) => Ok(previous),
            other => Err(unexpected("GETSET", &other)),
        }
    }

    /// MGET key [key ...]
    pub fn mget(&self, keys: &[&str]) -> DriverResult<Vec<Option<Bytes>>> {
        if keys.is_empty() {
            return Err(DriverError::invalid_argument("Keys must not be empty"));
        }

        let command = Command::mget(keys.iter().map(|k| Bytes::copy_from_slice(k.as_bytes())));
        match self.execute(command)? {
            Response::Values(values) => Ok(values),
            other => Err(unexpected("MGET", &other)),
        }
    }

    /// DEL key [key ...] - 삭제된 키 수 반환
    pub fn del(&self, keys: &[&str]) -> DriverResult<i64> {
        if keys.is_empty() {
            return Err(DriverError::invalid_argument("Keys must not be empty"));
        }

        let command = Command::del(keys.iter().map(|k| Bytes::copy_from_slice(k.as_bytes())));
        match self.execute(command)? {
            Response::Integer(count) => Ok(count),
            other => Err(unexpected("DEL", &other)),
        }
    }

    /// EXISTS key
    pub fn exists(&self, key: impl Into<Bytes>) -> DriverResult<bool> {
        match self.execute(Command::exists(key))? {
            Response::Integer(count) => Ok(count > 0),
            other => Err(unexpected("EXISTS", &other)),
        }
    }

    /// INCR key
    pub fn incr(&self, key: impl Into<Bytes>) -> DriverResult<i64> {
        match self.execute(Command::incr(key))? {
            Response::Integer(value) => Ok(value),
            other => Err(unexpected("INCR", &other)),
        }
    }

    /// INCRBY key delta
    pub fn incrby(&self, key: impl Into<Bytes>, delta: i64) -> DriverResult<i64> {
        match self.execute(Command::incrby(key, delta))? {
            Response::Integer(value) => Ok(value),
            other => Err(unexpected("INCRBY", &other)),
        }
    }

    /// TTL key - 남은 초, 키 없음/만료 없음은 음수
    pub fn ttl(&self, key: impl Into<Bytes>) -> DriverResult<i64> {
        match self.execute(Command::ttl(key))? {
            Response::Integer(seconds) => Ok(seconds),
            other => Err(unexpected("TTL", &other)),
        }
    }

    /// EXPIRE key seconds - 만료가 설정되었는지 여부
    pub fn expire(&self, key: impl Into<Bytes>, ttl: Duration) -> DriverResult<bool> {
        match self.execute(Command::expire(key, ttl))? {
            Response::Integer(set) => Ok(set == 1),
            other => Err(unexpected("EXPIRE", &other)),
        }
    }
}

fn unexpected(operation: &str, response: &Response) -> DriverError {
    DriverError::protocol(format!("Unexpected {operation} response: {response:?}"))
}

// ============================================================================
// Tests
// ============================================================================
