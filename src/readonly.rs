//! Read-Only Command Registry
//!
//! 읽기 전용 명령 레지스트리
//!
//! 프로세스 전역 불변 조회 테이블입니다. 시작 시점에 상수로 고정되며
//! 이후 절대 변경되지 않습니다.

use super::command::CommandName;

/// 읽기 전용 명령 목록
///
/// 여기에 없는 명령은 모두 쓰기로 취급됩니다 (보수적 기본값).
pub const READ_ONLY_COMMANDS: &[CommandName] = &[
    CommandName::Get,
    CommandName::GetRange,
    CommandName::MGet,
    CommandName::Exists,
    CommandName::Keys,
    CommandName::Scan,
    CommandName::Ttl,
    CommandName::Pttl,
    CommandName::Type,
    CommandName::StrLen,
    CommandName::RandomKey,
    CommandName::DbSize,
    CommandName::Ping,
    CommandName::Echo,
    CommandName::Info,
    CommandName::Time,
];

/// 읽기 전용 명령 여부
pub fn is_read_only(name: CommandName) -> bool {
    READ_ONLY_COMMANDS.contains(&name)
}

// ============================================================================
// Tests
// ============================================================================
