//! Connection Provider Contracts
//!
//! 연결 제공자 계약
//!
//! 토폴로지 관리(프라이머리/레플리카 엔드포인트 목록, 풀링, 레플리카 선택)는
//! 이 크레이트 밖의 콜라보레이터가 담당합니다. 라우터는 여기 정의된 계약만
//! 사용합니다.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::command::Command;
use super::error::DriverResult;
use super::intent::Intent;

// ============================================================================
// ReadFrom - 읽기 선호 정책
// ============================================================================

/// 읽기 선호 정책
///
/// 읽기 인텐트 명령을 어느 노드에서 처리할지에 대한 선호입니다.
/// 실제 노드 선택은 연결 제공자가 수행합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReadFrom {
    /// 항상 프라이머리 (기본값)
    #[default]
    Primary,
    /// 프라이머리 우선, 불가 시 레플리카
    PrimaryPreferred,
    /// 항상 레플리카
    Replica,
    /// 레플리카 우선, 불가 시 프라이머리
    ReplicaPreferred,
}

// ============================================================================
// NodeConnection - 노드 연결 핸들
// ============================================================================

/// 노드 연결 핸들
///
/// 제공자가 소유한 살아있는 전송 엔드포인트에 대한 참조입니다. 라우터는
/// 디스패치 호출 동안만 빌려 쓰며, 호출 간에 캐시하지 않습니다 (제공자가
/// 페일오버 등으로 호출 사이에 엔드포인트를 교체할 수 있음).
///
/// 디스패치는 실패하지 않습니다. 전송 에러는 각 명령의 완료 슬롯을 통해
/// 전달됩니다.
pub trait NodeConnection: Send + Sync {
    /// 단일 명령 디스패치
    fn dispatch(&self, command: Command) -> Command;

    /// 배치 디스패치
    fn dispatch_batch(&self, commands: Vec<Command>) -> Vec<Command>;
}

// ============================================================================
// ConnectionProvider - 연결 제공자
// ============================================================================

/// 연결 제공자
///
/// 인텐트에 맞는 연결을 반환하고, 토폴로지 전체의 종료/리셋/플러시 토글을
/// 노출합니다.
pub trait ConnectionProvider: Send + Sync {
    /// 인텐트에 맞는 연결 반환
    fn connection(&self, intent: Intent) -> DriverResult<Arc<dyn NodeConnection>>;

    /// 관리 중인 모든 연결 해제
    fn close(&self);

    /// 모든 연결 상태 리셋
    fn reset(&self);

    /// 자동 플러시 토글
    ///
    /// 꺼져 있으면 명령은 명시적 플러시까지 누적됩니다. 이 계층은 자동
    /// 플러시가 꺼진 상태에서 암묵적으로 플러시하지 않습니다.
    fn set_auto_flush_commands(&self, auto_flush: bool);

    /// 누적된 명령 플러시
    fn flush_commands(&self);

    /// 읽기 선호 정책 설정
    fn set_read_from(&self, read_from: ReadFrom);

    /// 읽기 선호 정책 조회
    fn read_from(&self) -> ReadFrom;
}

// ============================================================================
// Tests
// ============================================================================
