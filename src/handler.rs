//! Connection Lifecycle Handler
//!
//! 연결 수명주기 핸들러
//!
//! 모든 논리 연결이 공유하는 기반 동작입니다. open/active/closed 상태를
//! 추적하고, 타임아웃 설정을 보관하며, 디스패치를 라우터로 전달하고,
//! 종료 이벤트 시스템을 구동합니다.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use super::command::Command;
use super::error::{DriverError, DriverResult};
use super::events::{CloseEvents, CloseListener};
use super::options::ClientOptions;
use super::provider::ReadFrom;
use super::writer::RoutingWriter;

// ============================================================================
// Closeable - 해제 가능 자원
// ============================================================================

/// 해제 가능 자원
///
/// 핸들러 종료 시 연쇄 해제되는 보조 자원(예: pub/sub 서브 연결)의
/// 계약입니다.
pub trait Closeable: Send + Sync {
    /// 자원 해제
    fn close(&self) -> DriverResult<()>;
}

/// 외부 소유 자원 레지스트리
///
/// 핸들러는 등록된 자원의 해제만 트리거할 뿐 수명을 소유하지 않습니다.
pub type CloseableRegistry = Arc<Mutex<Vec<Arc<dyn Closeable>>>>;

// ============================================================================
// ConnectionHandler - 연결 수명주기 핸들러
// ============================================================================

/// 연결 수명주기 핸들러
///
/// 초기 상태는 ACTIVE-OPEN입니다. CLOSED는 종단 상태이며 한 번 설정되면
/// 되돌릴 수 없습니다. closed/active 플래그는 종료 락 없이도 읽을 수
/// 있도록 원자적으로 유지됩니다 (디스패치 핫패스는 락을 잡지 않음).
pub struct ConnectionHandler {
    writer: RoutingWriter,
    timeout: RwLock<Duration>,
    options: RwLock<ClientOptions>,
    closed: AtomicBool,
    active: AtomicBool,
    /// 종료 전이와 리스너 집합을 함께 보호하는 락
    close_events: Mutex<CloseEvents>,
}

impl ConnectionHandler {
    /// 새 핸들러 생성
    pub fn new(writer: RoutingWriter, timeout: Duration) -> Self {
        Self {
            writer,
            timeout: RwLock::new(timeout),
            options: RwLock::new(ClientOptions::default()),
            closed: AtomicBool::new(false),
            active: AtomicBool::new(true),
            close_events: Mutex::new(CloseEvents::new()),
        }
    }

    /// 단일 명령 디스패치
    ///
    /// 닫힘 검사는 라우터가 수행합니다 (트래픽 경로의 closed 판정 권한은
    /// 라우터에 있음).
    pub fn dispatch(&self, command: Command) -> DriverResult<Command> {
        tracing::debug!(command = %command.name(), "dispatching command");
        self.writer.write(command)
    }

    /// 배치 디스패치
    pub fn dispatch_batch(&self, commands: Vec<Command>) -> DriverResult<Vec<Command>> {
        tracing::debug!(count = commands.len(), "dispatching commands");
        self.writer.write_batch(commands)
    }

    /// 핸들러 종료
    ///
    /// 멱등: 하나의 스레드만 전이를 수행합니다. 전이 순서는 active=false,
    /// closed=true이며 호출 반환 전에 모든 스레드에 보입니다. 라우터 종료
    /// 위임 후 등록된 리스너가 정확히 한 번 발화되고, 리스너 집합은 새 빈
    /// 집합으로 교체됩니다.
    pub fn close(&self) {
        let mut events = self.close_events.lock();

        if self.closed.load(Ordering::Acquire) {
            tracing::warn!("connection is already closed");
            return;
        }

        self.active.store(false, Ordering::Release);
        self.closed.store(true, Ordering::Release);

        self.writer.close();

        let fired = std::mem::take(&mut *events);
        fired.fire_event_closed(self);
    }

    /// 종료 리스너 등록
    ///
    /// 종료 전이 이후에 등록된 리스너는 영원히 발화되지 않습니다 (CLOSED는
    /// 종단 상태). 리스너는 자신을 통지 중인 핸들러의 `close()`를 다시
    /// 호출해서는 안 됩니다.
    pub fn add_listener(&self, listener: CloseListener) {
        self.close_events.lock().add_listener(listener);
    }

    /// 보조 자원 등록
    ///
    /// `closeables`를 외부 소유 레지스트리에 추가하고, 종료 시 각 자원을
    /// 최선 노력으로 해제하는 원샷 리스너를 설치합니다. 하나의 해제 실패는
    /// 기록만 되고 나머지 해제나 종료 시퀀스를 막지 않습니다. 자기 자신은
    /// 재진입 이중 종료를 피하기 위해 건너뜁니다. 해제 후 해당 항목은
    /// 레지스트리에서 제거됩니다.
    pub fn register_closeables(
        &self,
        registry: &CloseableRegistry,
        closeables: Vec<Arc<dyn Closeable>>,
    ) {
        registry.lock().extend(closeables.iter().cloned());

        let registry = Arc::clone(registry);
        self.add_listener(Box::new(move |handler| {
            for closeable in &closeables {
                if Arc::as_ptr(closeable) as *const ()
                    == handler as *const ConnectionHandler as *const ()
                {
                    continue;
                }

                if let Err(e) = closeable.close() {
                    tracing::debug!(error = %e, "failed to close registered resource");
                }
            }

            let mut entries = registry.lock();
            entries.retain(|entry| !closeables.iter().any(|c| Arc::ptr_eq(entry, c)));
        }));
    }

    /// 전송 연결 활성화 통지
    ///
    /// ACTIVE/INACTIVE 차원만 변경합니다. CLOSED는 종단 상태이므로 여기서
    /// 되살아나지 않습니다.
    pub fn activated(&self) {
        self.active.store(true, Ordering::Release);
    }

    /// 전송 연결 비활성화 통지
    pub fn deactivated(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// 종료 여부 (수명주기의 종단 상태)
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// 사용 가능 여부 (활성이고 닫히지 않음)
    pub fn is_open(&self) -> bool {
        self.active.load(Ordering::Acquire) && !self.closed.load(Ordering::Acquire)
    }

    /// 명령 타임아웃 조회
    pub fn timeout(&self) -> Duration {
        *self.timeout.read()
    }

    /// 명령 타임아웃 설정
    pub fn set_timeout(&self, timeout: Duration) {
        *self.timeout.write() = timeout;
    }

    /// 클라이언트 옵션 조회
    pub fn options(&self) -> ClientOptions {
        self.options.read().clone()
    }

    /// 클라이언트 옵션 설정
    pub fn set_options(&self, options: ClientOptions) {
        *self.options.write() = options;
    }

    /// 자동 플러시 토글 (라우터 위임)
    pub fn set_auto_flush_commands(&self, auto_flush: bool) {
        self.writer.set_auto_flush_commands(auto_flush);
    }

    /// 누적 명령 플러시 (라우터 위임)
    pub fn flush_commands(&self) {
        self.writer.flush_commands();
    }

    /// 연결 상태 리셋 (라우터 위임)
    pub fn reset(&self) {
        self.writer.reset();
    }

    /// 읽기 선호 정책 설정 (라우터 위임)
    pub fn set_read_from(&self, read_from: ReadFrom) {
        self.writer.set_read_from(read_from);
    }

    /// 읽기 선호 정책 조회 (라우터 위임)
    pub fn read_from(&self) -> ReadFrom {
        self.writer.read_from()
    }

    /// 소유한 라우터 참조
    pub fn writer(&self) -> &RoutingWriter {
        &self.writer
    }
}

impl Closeable for ConnectionHandler {
    fn close(&self) -> DriverResult<()> {
        ConnectionHandler::close(self);
        Ok(())
    }
}

impl std::fmt::Debug for ConnectionHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandler")
            .field("closed", &self.is_closed())
            .field("open", &self.is_open())
            .field("timeout", &self.timeout())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Intent;
    use crate::provider::{ConnectionProvider, NodeConnection};
    use std::sync::atomic::AtomicUsize;

    struct NoopConnection;

    impl NodeConnection for NoopConnection {
        fn dispatch(&self, command: Command) -> Command {
            command
        }

        fn dispatch_batch(&self, commands: Vec<Command>) -> Vec<Command> {
            commands
        }
    }

    #[derive(Default)]
    struct CountingProvider {
        close_calls: AtomicUsize,
    }

    impl ConnectionProvider for Arc<CountingProvider> {
        fn connection(&self, _intent: Intent) -> DriverResult<Arc<dyn NodeConnection>> {
            Ok(Arc::new(NoopConnection))
        }

        fn close(&self) {
            self.close_calls.fetch_add(1, Ordering::Relaxed);
        }

        fn reset(&self) {}
        fn set_auto_flush_commands(&self, _auto_flush: bool) {}
        fn flush_commands(&self) {}
        fn set_read_from(&self, _read_from: ReadFrom) {}

        fn read_from(&self) -> ReadFrom {
            ReadFrom::default()
        }
    }

    fn handler_with_provider() -> (ConnectionHandler, Arc<CountingProvider>) {
        let provider = Arc::new(CountingProvider::default());
        let writer = RoutingWriter::new(Box::new(provider.clone()));
        let handler = ConnectionHandler::new(writer, Duration::from_secs(60));
        (handler, provider)
    }

    /// 해제 시도를 기록하는 모의 자원
    struct MockResource {
        close_calls: AtomicUsize,
        fail: bool,
    }

    impl MockResource {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                close_calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    impl Closeable for MockResource {
        fn close(&self) -> DriverResult<()> {
            self.close_calls.fetch_add(1, Ordering::Relaxed);
            if self.fail {
                Err(DriverError::connection("resource close failed"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_initial_state_is_active_open() {
        let (handler, _provider) = handler_with_provider();
        assert!(handler.is_open());
        assert!(!handler.is_closed());
    }

    #[test]
    fn test_activated_deactivated_toggle() {
        let (handler, _provider) = handler_with_provider();

        handler.deactivated();
        assert!(!handler.is_open());
        assert!(!handler.is_closed());

        handler.activated();
        assert!(handler.is_open());
    }

    #[test]
    fn test_closed_is_terminal() {
        let (handler, _provider) = handler_with_provider();

        handler.close();
        assert!(handler.is_closed());
        assert!(!handler.is_open());

        // activated()는 ACTIVE 차원만 바꾸며 CLOSED를 되돌리지 못함
        handler.activated();
        assert!(handler.is_closed());
        assert!(!handler.is_open());
    }

    #[test]
    fn test_dispatch_after_close_fails() {
        let (handler, _provider) = handler_with_provider();

        handler.close();

        let result = handler.dispatch(Command::get("k1"));
        assert!(matches!(result, Err(DriverError::ConnectionClosed)));

        let result = handler.dispatch_batch(vec![Command::get("k1")]);
        assert!(matches!(result, Err(DriverError::ConnectionClosed)));
    }

    #[test]
    fn test_close_delegates_to_writer_once() {
        let (handler, provider) = handler_with_provider();

        handler.close();
        handler.close();
        handler.close();

        assert_eq!(provider.close_calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_listener_fires_exactly_once_with_handler() {
        let (handler, _provider) = handler_with_provider();

        let fired = Arc::new(AtomicUsize::new(0));
        let seen_addr = Arc::new(Mutex::new(None::<usize>));

        let fired_clone = fired.clone();
        let seen_clone = seen_addr.clone();
        handler.add_listener(Box::new(move |h| {
            fired_clone.fetch_add(1, Ordering::Relaxed);
            *seen_clone.lock() = Some(h as *const ConnectionHandler as usize);
        }));

        handler.close();
        handler.close();

        assert_eq!(fired.load(Ordering::Relaxed), 1);
        assert_eq!(
            *seen_addr.lock(),
            Some(&handler as *const ConnectionHandler as usize)
        );
    }

    #[test]
    fn test_listener_after_close_never_fires() {
        let (handler, _provider) = handler_with_provider();

        handler.close();

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();
        handler.add_listener(Box::new(move |_| {
            fired_clone.fetch_add(1, Ordering::Relaxed);
        }));

        handler.close();
        assert_eq!(fired.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_multiple_listeners_fire_in_order() {
        let (handler, _provider) = handler_with_provider();

        let order = Arc::new(Mutex::new(Vec::new()));
        for id in 0..3 {
            let order = order.clone();
            handler.add_listener(Box::new(move |_| order.lock().push(id)));
        }

        handler.close();
        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn test_concurrent_close_fires_once() {
        let (handler, provider) = handler_with_provider();
        let handler = Arc::new(handler);

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();
        handler.add_listener(Box::new(move |_| {
            fired_clone.fetch_add(1, Ordering::Relaxed);
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let handler = handler.clone();
                std::thread::spawn(move || handler.close())
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        // 정확히 한 스레드만 해제 시퀀스를 수행
        assert_eq!(fired.load(Ordering::Relaxed), 1);
        assert_eq!(provider.close_calls.load(Ordering::Relaxed), 1);
        assert!(handler.is_closed());
    }

    #[test]
    fn test_register_closeables_best_effort() {
        let (handler, _provider) = handler_with_provider();
        let registry: CloseableRegistry = Arc::new(Mutex::new(Vec::new()));

        // a는 해제 시 실패하지만 b의 해제를 막지 않아야 함
        let a = MockResource::new(true);
        let b = MockResource::new(false);

        handler.register_closeables(&registry, vec![a.clone(), b.clone()]);
        assert_eq!(registry.lock().len(), 2);

        handler.close();

        assert_eq!(a.close_calls.load(Ordering::Relaxed), 1);
        assert_eq!(b.close_calls.load(Ordering::Relaxed), 1);
        // 해제 후 레지스트리에서 제거됨
        assert!(registry.lock().is_empty());
    }

    #[test]
    fn test_register_closeables_skips_self() {
        let provider = Arc::new(CountingProvider::default());
        let writer = RoutingWriter::new(Box::new(provider.clone()));
        let handler = Arc::new(ConnectionHandler::new(writer, Duration::from_secs(60)));

        let registry: CloseableRegistry = Arc::new(Mutex::new(Vec::new()));
        let resource = MockResource::new(false);

        // 자기 자신이 등록되어도 재진입 이중 종료가 일어나지 않아야 함
        let self_closeable: Arc<dyn Closeable> = handler.clone();
        handler.register_closeables(&registry, vec![self_closeable, resource.clone()]);

        handler.close();

        assert_eq!(resource.close_calls.load(Ordering::Relaxed), 1);
        assert_eq!(provider.close_calls.load(Ordering::Relaxed), 1);
        assert!(registry.lock().is_empty());
    }

    #[test]
    fn test_registry_keeps_unrelated_entries() {
        let (handler, _provider) = handler_with_provider();
        let registry: CloseableRegistry = Arc::new(Mutex::new(Vec::new()));

        let unrelated: Arc<dyn Closeable> = MockResource::new(false);
        registry.lock().push(unrelated.clone());

        let owned = MockResource::new(false);
        handler.register_closeables(&registry, vec![owned.clone()]);

        handler.close();

        // 핸들러가 등록한 항목만 제거됨
        let entries = registry.lock();
        assert_eq!(entries.len(), 1);
        assert!(Arc::ptr_eq(&entries[0], &unrelated));
    }

    #[test]
    fn test_timeout_and_options() {
        let (handler, _provider) = handler_with_provider();

        assert_eq!(handler.timeout(), Duration::from_secs(60));
        handler.set_timeout(Duration::from_millis(250));
        assert_eq!(handler.timeout(), Duration::from_millis(250));

        let options = ClientOptions::builder().auto_reconnect(false).build();
        handler.set_options(options.clone());
        assert_eq!(handler.options(), options);
    }

    #[test]
    fn test_read_from_delegation() {
        let (handler, _provider) = handler_with_provider();
        assert_eq!(handler.read_from(), ReadFrom::Primary);
    }
}
