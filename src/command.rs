//! Command Types
//!
//! 명령 값 객체와 완료 슬롯
//!
//! 라우터는 명령을 소비만 하고 변경하지 않습니다. 결과 슬롯은 전송 계층이
//! 채우며, 동기 파사드는 이 슬롯을 타임아웃과 함께 대기합니다.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::{Condvar, Mutex};

use super::error::{DriverError, DriverResult};

// ============================================================================
// CommandName - 명령 이름 (분류 태그)
// ============================================================================

/// 명령 이름
///
/// 라우팅 분류에 사용되는 비교 가능한 타입 태그입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)] // 변형 이름이 와이어 명령과 1:1 대응
pub enum CommandName {
    // 읽기 명령
    Get,
    GetRange,
    MGet,
    Exists,
    Keys,
    Scan,
    Ttl,
    Pttl,
    Type,
    StrLen,
    RandomKey,
    DbSize,
    Ping,
    Echo,
    Info,
    Time,
    // 쓰기 명령
    Set,
    SetNx,
    MSet,
    Append,
    GetSet,
    SetRange,
    Del,
    Incr,
    IncrBy,
    Decr,
    DecrBy,
    Expire,
    Persist,
    Rename,
    FlushDb,
}

impl CommandName {
    /// 와이어 표기 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::GetRange => "GETRANGE",
            Self::MGet => "MGET",
            Self::Exists => "EXISTS",
            Self::Keys => "KEYS",
            Self::Scan => "SCAN",
            Self::Ttl => "TTL",
            Self::Pttl => "PTTL",
            Self::Type => "TYPE",
            Self::StrLen => "STRLEN",
            Self::RandomKey => "RANDOMKEY",
            Self::DbSize => "DBSIZE",
            Self::Ping => "PING",
            Self::Echo => "ECHO",
            Self::Info => "INFO",
            Self::Time => "TIME",
            Self::Set => "SET",
            Self::SetNx => "SETNX",
            Self::MSet => "MSET",
            Self::Append => "APPEND",
            Self::GetSet => "GETSET",
            Self::SetRange => "SETRANGE",
            Self::Del => "DEL",
            Self::Incr => "INCR",
            Self::IncrBy => "INCRBY",
            Self::Decr => "DECR",
            Self::DecrBy => "DECRBY",
            Self::Expire => "EXPIRE",
            Self::Persist => "PERSIST",
            Self::Rename => "RENAME",
            Self::FlushDb => "FLUSHDB",
        }
    }
}

impl std::fmt::Display for CommandName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Response - 응답 값
// ============================================================================

/// 전송 계층이 완료 슬롯에 채우는 응답 값
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// 단순 확인 응답
    Ok,
    /// 단순 문자열 (PONG 등)
    Simple(String),
    /// 정수 응답
    Integer(i64),
    /// 단일 값 (없으면 None)
    Value(Option<Bytes>),
    /// 다중 값 (MGET 등)
    Values(Vec<Option<Bytes>>),
}

// ============================================================================
// CommandOutput - 완료 슬롯
// ============================================================================

/// 명령 완료 슬롯
///
/// 전송 계층이 `complete`/`fail`로 채우고, 호출자는 `wait`로 대기합니다.
/// 한 번 채워진 슬롯은 다시 변경되지 않습니다.
#[derive(Debug, Default)]
pub struct CommandOutput {
    state: Mutex<Option<DriverResult<Response>>>,
    done: Condvar,
}

impl CommandOutput {
    /// 새 완료 슬롯 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 응답으로 완료
    pub fn complete(&self, response: Response) {
        let mut state = self.state.lock();
        if state.is_none() {
            *state = Some(Ok(response));
            self.done.notify_all();
        }
    }

    /// 에러로 완료
    pub fn fail(&self, error: DriverError) {
        let mut state = self.state.lock();
        if state.is_none() {
            *state = Some(Err(error));
            self.done.notify_all();
        }
    }

    /// 완료 여부
    pub fn is_done(&self) -> bool {
        self.state.lock().is_some()
    }

    /// 완료까지 대기
    ///
    /// 타임아웃이 경과하면 `DriverError::Timeout`을 반환합니다.
    pub fn wait(&self, timeout: Duration) -> DriverResult<Response> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();

        while state.is_none() {
            if self.done.wait_until(&mut state, deadline).timed_out() {
                return Err(DriverError::timeout("Command timed out"));
            }
        }

        match state.as_ref() {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(e)) => Err(DriverError::connection(e.to_string())),
            None => Err(DriverError::timeout("Command timed out")),
        }
    }
}

// ============================================================================
// Command - 명령 값 객체
// ============================================================================

/// 명령 값 객체
///
/// 이름(분류 태그), 인자 바이트, 공유 완료 슬롯으로 구성됩니다.
/// 제출 이후 라우터 관점에서는 불변이며, clone은 완료 슬롯을 공유합니다.
#[derive(Debug, Clone)]
pub struct Command {
    name: CommandName,
    args: Vec<Bytes>,
    output: Arc<CommandOutput>,
}

impl Command {
    /// 새 명령 생성
    pub fn new(name: CommandName, args: Vec<Bytes>) -> Self {
        Self {
            name,
            args,
            output: Arc::new(CommandOutput::new()),
        }
    }

    /// 명령 이름
    pub fn name(&self) -> CommandName {
        self.name
    }

    /// 명령 인자
    pub fn args(&self) -> &[Bytes] {
        &self.args
    }

    /// 완료 슬롯
    pub fn output(&self) -> &CommandOutput {
        &self.output
    }

    // ------------------------------------------------------------------
    // 명령 빌더
    // ------------------------------------------------------------------

    /// GET key
    pub fn get(key: impl Into<Bytes>) -> Self {
        Self::new(CommandName::Get, vec![key.into()])
    }

    /// SET key value
    pub fn set(key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        Self::new(CommandName::Set, vec![key.into(), value.into()])
    }

    /// GETSET key value
    pub fn getset(key: impl Into<Bytes>, value: impl Into<Bytes>) -> Self {
        Self::new(CommandName::GetSet, vec![key.into(), value.into()])
    }

    /// MGET key [key ...]
    pub fn mget<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Bytes>,
    {
        Self::new(CommandName::MGet, keys.into_iter().map(Into::into).collect())
    }

    /// DEL key [key ...]
    pub fn del<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Bytes>,
    {
        Self::new(CommandName::Del, keys.into_iter().map(Into::into).collect())
    }

    /// EXISTS key
    pub fn exists(key: impl Into<Bytes>) -> Self {
        Self::new(CommandName::Exists, vec![key.into()])
    }

    /// INCR key
    pub fn incr(key: impl Into<Bytes>) -> Self {
        Self::new(CommandName::Incr, vec![key.into()])
    }

    /// INCRBY key delta
    pub fn incrby(key: impl Into<Bytes>, delta: i64) -> Self {
        Self::new(
            CommandName::IncrBy,
            vec![key.into(), Bytes::from(delta.to_string())],
        )
    }

    /// TTL key
    pub fn ttl(key: impl Into<Bytes>) -> Self {
        Self::new(CommandName::Ttl, vec![key.into()])
    }

    /// EXPIRE key seconds
    pub fn expire(key: impl Into<Bytes>, ttl: Duration) -> Self {
        Self::new(
            CommandName::Expire,
            vec![key.into(), Bytes::from(ttl.as_secs().to_string())],
        )
    }

    /// PING
    pub fn ping() -> Self {
        Self::new(CommandName::Ping, Vec::new())
    }

    /// ECHO message
    pub fn echo(message: impl Into<Bytes>) -> Self {
        Self::new(CommandName::Echo, vec![message.into()])
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_name_as_str() {
        assert_eq!(CommandName::Get.as_str(), "GET");
        assert_eq!(CommandName::Set.as_str(), "SET");
        assert_eq!(CommandName::FlushDb.as_str(), "FLUSHDB");
        assert_eq!(CommandName::Ping.to_string(), "PING");
    }

    #[test]
    fn test_command_builders() {
        let cmd = Command::get("key1");
        assert_eq!(cmd.name(), CommandName::Get);
        assert_eq!(cmd.args(), &[Bytes::from("key1")]);

        let cmd = Command::set("key1", "value1");
        assert_eq!(cmd.name(), CommandName::Set);
        assert_eq!(cmd.args().len(), 2);

        let cmd = Command::mget(["k1", "k2", "k3"]);
        assert_eq!(cmd.name(), CommandName::MGet);
        assert_eq!(cmd.args().len(), 3);

        let cmd = Command::expire("key1", Duration::from_secs(60));
        assert_eq!(cmd.args()[1], Bytes::from("60"));

        let cmd = Command::ping();
        assert!(cmd.args().is_empty());
    }

    #[test]
    fn test_output_complete_and_wait() {
        let cmd = Command::get("key1");
        cmd.output().complete(Response::Value(Some(Bytes::from("v"))));

        assert!(cmd.output().is_done());
        let response = cmd.output().wait(Duration::from_millis(10)).unwrap();
        assert_eq!(response, Response::Value(Some(Bytes::from("v"))));
    }

    #[test]
    fn test_output_first_completion_wins() {
        let output = CommandOutput::new();
        output.complete(Response::Integer(1));
        output.complete(Response::Integer(2));
        output.fail(DriverError::connection("late"));

        // 최초 완료 값이 유지됨
        let response = output.wait(Duration::from_millis(10)).unwrap();
        assert_eq!(response, Response::Integer(1));
    }

    #[test]
    fn test_output_fail_propagates() {
        let output = CommandOutput::new();
        output.fail(DriverError::connection("reset by peer"));

        let result = output.wait(Duration::from_millis(10));
        assert!(result.is_err());
    }

    #[test]
    fn test_output_wait_timeout() {
        let output = CommandOutput::new();

        let result = output.wait(Duration::from_millis(20));
        assert!(matches!(result, Err(DriverError::Timeout(_))));
    }

    #[test]
    fn test_output_wait_from_another_thread() {
        let cmd = Command::get("key1");
        let shared = cmd.clone();

        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            shared.output().complete(Response::Ok);
        });

        let response = cmd.output().wait(Duration::from_secs(2)).unwrap();
        assert_eq!(response, Response::Ok);
        handle.join().unwrap();
    }

    #[test]
    fn test_clone_shares_output() {
        let cmd = Command::get("key1");
        let cloned = cmd.clone();

        cloned.output().complete(Response::Ok);
        assert!(cmd.output().is_done());
    }
}
