//! Routing Writer
//!
//! 인텐트 기반 명령 라우터
//!
//! 명령(또는 배치)의 인텐트를 분류하고, 해당 인텐트에 맞는 연결을 제공자에게
//! 요청해 전달합니다. 제공자에 대한 참조를 단독 소유하며, 자체 closed 플래그를
//! 갖되 종료는 제공자에 위임합니다.

use std::sync::atomic::{AtomicBool, Ordering};

use super::command::Command;
use super::error::{DriverError, DriverResult};
use super::intent::Intent;
use super::provider::{ConnectionProvider, ReadFrom};

// ============================================================================
// RoutingWriter - 라우팅 라이터
// ============================================================================

/// 라우팅 라이터
///
/// 애플리케이션 연결 객체가 사용하는 디스패치 진입점입니다. 쓰기 경로는
/// 라우터 전역 락을 잡지 않고 closed 플래그만 읽습니다 (빠른 실패 후 위임).
pub struct RoutingWriter {
    provider: Box<dyn ConnectionProvider>,
    closed: AtomicBool,
}

impl RoutingWriter {
    /// 새 라우팅 라이터 생성
    pub fn new(provider: Box<dyn ConnectionProvider>) -> Self {
        Self {
            provider,
            closed: AtomicBool::new(false),
        }
    }

    /// 단일 명령 라우팅
    ///
    /// 명령의 인텐트를 분류하고, 그 인텐트의 연결로 전달한 뒤 동일한 명령
    /// 핸들을 반환합니다. 결과는 전송 계층이 비동기로 채웁니다 (라우터는
    /// 대기하지 않음).
    pub fn write(&self, command: Command) -> DriverResult<Command> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DriverError::ConnectionClosed);
        }

        let intent = Intent::of(command.name());
        tracing::debug!(command = %command.name(), ?intent, "dispatching command");

        let connection = self.provider.connection(intent)?;
        Ok(connection.dispatch(command))
    }

    /// 배치 라우팅
    ///
    /// 배치 전체에 대해 하나의 집계 인텐트를 계산하고, 모든 명령을 집계
    /// 인텐트로 판정해 read/write 두 시퀀스로 나눕니다. 집계 값이 모든
    /// 원소에 동일하게 적용되므로 전체 배치는 정확히 한 시퀀스에 들어가고,
    /// 비어 있지 않은 쪽이 하나의 배치로 디스패치됩니다. 반환 순서는
    /// `to_read` 뒤에 `to_write`이며, 한쪽이 항상 비므로 입력 순서와
    /// 관측상 동일합니다.
    pub fn write_batch(&self, commands: Vec<Command>) -> DriverResult<Vec<Command>> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DriverError::ConnectionClosed);
        }

        let intent = Intent::aggregate(&commands);
        tracing::debug!(count = commands.len(), ?intent, "dispatching batch");

        let mut to_read = Vec::with_capacity(commands.len());
        let mut to_write = Vec::with_capacity(commands.len());

        // 순서 유지: 명령별 인텐트가 아니라 집계 인텐트로 판정
        for command in commands {
            if intent == Intent::Read {
                to_read.push(command);
            } else {
                to_write.push(command);
            }
        }

        if !to_read.is_empty() {
            let connection = self.provider.connection(Intent::Read)?;
            to_read = connection.dispatch_batch(to_read);
        }

        if !to_write.is_empty() {
            let connection = self.provider.connection(Intent::Write)?;
            to_write = connection.dispatch_batch(to_write);
        }

        to_read.extend(to_write);
        Ok(to_read)
    }

    /// 라우터 종료
    ///
    /// 멱등: 최초 호출만 제공자 종료를 위임하고, 이후 호출은 no-op입니다.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        self.provider.close();
    }

    /// 종료 여부
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// 자동 플러시 토글 (제공자 위임)
    pub fn set_auto_flush_commands(&self, auto_flush: bool) {
        self.provider.set_auto_flush_commands(auto_flush);
    }

    /// 누적 명령 플러시 (제공자 위임)
    pub fn flush_commands(&self) {
        self.provider.flush_commands();
    }

    /// 연결 상태 리셋 (제공자 위임)
    pub fn reset(&self) {
        self.provider.reset();
    }

    /// 읽기 선호 정책 설정 (제공자 위임)
    pub fn set_read_from(&self, read_from: ReadFrom) {
        self.provider.set_read_from(read_from);
    }

    /// 읽기 선호 정책 조회 (제공자 위임, 기본값은 프라이머리 선호)
    pub fn read_from(&self) -> ReadFrom {
        self.provider.read_from()
    }

    /// 연결 제공자 참조
    pub fn connection_provider(&self) -> &dyn ConnectionProvider {
        self.provider.as_ref()
    }
}

impl std::fmt::Debug for RoutingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingWriter")
            .field("closed", &self.is_closed())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
