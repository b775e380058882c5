//! Intent Classification
//!
//! 명령 인텐트 분류
//!
//! 명령이 원격 상태를 읽기만 하는지(READ) 변경하는지(WRITE)를 판정합니다.
//! 인텐트에 따라 명령이 프라이머리로 갈지 레플리카로 갈지 결정됩니다.

use super::command::{Command, CommandName};
use super::readonly;

// ============================================================================
// Intent - 인텐트
// ============================================================================

/// 명령 인텐트
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Intent {
    /// 읽기 (레플리카 라우팅 가능)
    Read,
    /// 쓰기 (프라이머리 라우팅, 보수적 기본값)
    #[default]
    Write,
}

impl Intent {
    /// 단일 명령의 인텐트 분류
    ///
    /// 읽기 전용 레지스트리에 대한 순수 조회이며, 등록되지 않은 명령은
    /// 모두 `Write`입니다.
    pub fn of(name: CommandName) -> Self {
        if readonly::is_read_only(name) {
            Self::Read
        } else {
            Self::Write
        }
    }

    /// 배치 전체의 집계 인텐트
    ///
    /// 모든 명령이 같은 인텐트면 그 값을, 서로 다른 인텐트가 관측되는
    /// 즉시 `Write`를 반환합니다. 빈 배치는 `Write`입니다.
    ///
    /// 배치 전체에 대한 단일 결정이며, 명령별 분할은 하지 않습니다.
    pub fn aggregate(commands: &[Command]) -> Self {
        let mut aggregate = Self::Write;
        let mut first: Option<Self> = None;

        for command in commands {
            aggregate = Self::of(command.name());

            match first {
                None => first = Some(aggregate),
                Some(seen) if seen != aggregate => return Self::Write,
                Some(_) => {}
            }
        }

        aggregate
    }
}

// ============================================================================
// Tests
// ============================================================================
