//! Client Options
//!
//! 클라이언트 옵션
//!
//! 핸들러가 보관하고 전송 콜라보레이터가 해석하는 연결 동작 설정입니다.

use serde::{Deserialize, Serialize};

// ============================================================================
// DisconnectedBehavior - 연결 끊김 동작
// ============================================================================

/// 연결이 끊긴 동안의 명령 수용 동작
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisconnectedBehavior {
    /// 자동 재연결 설정에 따름 (기본값)
    #[default]
    Default,
    /// 끊긴 동안에도 명령 수용 (재연결 후 전송)
    AcceptCommands,
    /// 끊긴 동안 명령 거부
    RejectCommands,
}

// ============================================================================
// ClientOptions - 클라이언트 옵션
// ============================================================================

/// 클라이언트 옵션
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// 자동 재연결 여부
    pub auto_reconnect: bool,
    /// 연결 활성화 전 PING 수행 여부
    pub ping_before_activate: bool,
    /// 재연결 실패 시 대기 중인 명령 취소 여부
    pub cancel_commands_on_reconnect_failure: bool,
    /// 요청 큐 최대 크기
    pub request_queue_size: usize,
    /// 연결 끊김 동작
    pub disconnected_behavior: DisconnectedBehavior,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            auto_reconnect: true,
            ping_before_activate: false,
            cancel_commands_on_reconnect_failure: false,
            request_queue_size: usize::MAX,
            disconnected_behavior: DisconnectedBehavior::Default,
        }
    }
}

impl ClientOptions {
    /// 새 옵션 생성 (기본값)
    pub fn new() -> Self {
        Self::default()
    }

    /// 빌더 시작
    pub fn builder() -> ClientOptionsBuilder {
        ClientOptionsBuilder::default()
    }
}

// ============================================================================
// ClientOptionsBuilder - 옵션 빌더
// ============================================================================

/// 클라이언트 옵션 빌더
#[derive(Debug, Clone, Default)]
pub struct ClientOptionsBuilder {
    options: ClientOptions,
}

impl ClientOptionsBuilder {
    /// 자동 재연결 설정
    pub fn auto_reconnect(mut self, auto_reconnect: bool) -> Self {
        self.options.auto_reconnect = auto_reconnect;
        self
    }

    /// 활성화 전 PING 설정
    pub fn ping_before_activate(mut self, ping: bool) -> Self {
        self.options.ping_before_activate = ping;
        self
    }

    /// 재연결 실패 시 명령 취소 설정
    pub fn cancel_commands_on_reconnect_failure(mut self, cancel: bool) -> Self {
        self.options.cancel_commands_on_reconnect_failure = cancel;
        self
    }

    /// 요청 큐 크기 설정
    pub fn request_queue_size(mut self, size: usize) -> Self {
        self.options.request_queue_size = size;
        self
    }

    /// 연결 끊김 동작 설정
    pub fn disconnected_behavior(mut self, behavior: DisconnectedBehavior) -> Self {
        self.options.disconnected_behavior = behavior;
        self
    }

    /// 옵션 생성
    pub fn build(self) -> ClientOptions {
        self.options
    }
}

// ============================================================================
// Tests
// ============================================================================
