//! Close Events
//!
//! 종료 이벤트 레지스트리
//!
//! 핸들러가 닫힘 상태로 전이할 때 정확히 한 번 통지되는 원샷 리스너
//! 집합입니다. 발화 후에는 새 빈 집합으로 교체됩니다.

use super::handler::ConnectionHandler;

/// 종료 리스너
///
/// 닫히는 핸들러를 인자로 받아 한 번만 호출됩니다.
pub type CloseListener = Box<dyn FnOnce(&ConnectionHandler) + Send>;

// ============================================================================
// CloseEvents - 종료 이벤트 레지스트리
// ============================================================================

/// 종료 이벤트 레지스트리
///
/// 등록 순서를 유지하며, 소유 핸들러의 종료 전이와 같은 락 아래에서만
/// 접근됩니다.
#[derive(Default)]
pub struct CloseEvents {
    listeners: Vec<CloseListener>,
}

impl CloseEvents {
    /// 새 레지스트리 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 리스너 등록
    pub fn add_listener(&mut self, listener: CloseListener) {
        self.listeners.push(listener);
    }

    /// 등록된 리스너 수
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// 리스너가 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// 모든 리스너 발화 (등록 순서대로, 레지스트리 소비)
    pub fn fire_event_closed(self, handler: &ConnectionHandler) {
        for listener in self.listeners {
            listener(handler);
        }
    }
}

impl std::fmt::Debug for CloseEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloseEvents")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_starts_empty() {
        let events = CloseEvents::new();
        assert!(events.is_empty());
        assert_eq!(events.len(), 0);
    }

    #[test]
    fn test_add_listener_preserves_order() {
        let mut events = CloseEvents::new();
        events.add_listener(Box::new(|_| {}));
        events.add_listener(Box::new(|_| {}));

        assert_eq!(events.len(), 2);
        assert!(!events.is_empty());
    }
}
