#[path = "../support.rs"]
mod support;

use std::future::poll_fn;
use support::let_dispatch_run;
use tokio_test::assert_pending;
use tower_fifo_limit::{Concurrency, FifoLimit, FifoLimitLayer, Limiter, SharedFifoLimitLayer};
use tower_layer::Layer;
use tower_service::Service;
use tower_test::{assert_request_eq, mock};

type Mock = mock::Mock<&'static str, &'static str>;
type Handle = mock::Handle<&'static str, &'static str>;

#[tokio::test]
async fn forwards_requests_one_at_a_time() {
    let _t = support::trace_init();

    let (mut service, mut handle) = new_service(1);

    ready(&mut service).await;
    let r1 = service.call("hello 1");
    ready(&mut service).await;
    let r2 = service.call("hello 2");

    let send_response1 = assert_request_eq!(handle, "hello 1");

    // the second request stays queued while the first is outstanding
    let_dispatch_run().await;
    assert_pending!(handle.poll_request());
    assert_eq!(service.limiter().active_count(), 1);
    assert_eq!(service.limiter().pending_count(), 1);

    send_response1.send_response("world 1");
    assert_eq!(r1.await.unwrap(), "world 1");

    assert_request_eq!(handle, "hello 2").send_response("world 2");
    assert_eq!(r2.await.unwrap(), "world 2");

    assert_eq!(service.limiter().active_count(), 0);
}

#[tokio::test]
async fn admitted_request_waits_for_inner_readiness() {
    let _t = support::trace_init();

    let (mut service, mut handle) = new_service(2);

    handle.allow(0);

    ready(&mut service).await;
    let response = service.call("hello");

    let_dispatch_run().await;
    assert_pending!(handle.poll_request());
    assert_eq!(service.limiter().active_count(), 1);

    handle.allow(1);

    assert_request_eq!(handle, "hello").send_response("world");
    assert_eq!(response.await.unwrap(), "world");
}

#[tokio::test]
async fn inner_errors_reach_the_caller() {
    let _t = support::trace_init();

    let (mut service, mut handle) = new_service(1);

    handle.allow(0);
    handle.send_error("foobar");

    ready(&mut service).await;
    let failed = service.call("hello");

    let err = failed.await.unwrap_err();
    assert_eq!(err.to_string(), "foobar");
    assert_eq!(service.limiter().active_count(), 0);

    handle.allow(1);

    ready(&mut service).await;
    let response = service.call("hello again");

    assert_request_eq!(handle, "hello again").send_response("world");
    assert_eq!(response.await.unwrap(), "world");
}

#[tokio::test]
async fn shared_layer_applies_one_bound_to_every_service() {
    let _t = support::trace_init();

    let limiter = Limiter::new(1).unwrap();
    let layer = SharedFifoLimitLayer::new(limiter.clone());

    let (a, mut handle_a) = mock::pair::<&'static str, &'static str>();
    let (b, mut handle_b) = mock::pair::<&'static str, &'static str>();
    let mut a = layer.layer(a);
    let mut b = layer.layer(b);

    ready(&mut a).await;
    let ra = a.call("to a");
    ready(&mut b).await;
    let rb = b.call("to b");

    let send_a = assert_request_eq!(handle_a, "to a");

    let_dispatch_run().await;
    assert_pending!(handle_b.poll_request());
    assert_eq!(limiter.active_count(), 1);
    assert_eq!(limiter.pending_count(), 1);

    send_a.send_response("from a");
    assert_eq!(ra.await.unwrap(), "from a");

    assert_request_eq!(handle_b, "to b").send_response("from b");
    assert_eq!(rb.await.unwrap(), "from b");
}

#[tokio::test]
async fn layer_gives_each_service_its_own_limiter() {
    let layer = FifoLimitLayer::new(Concurrency::new(1).unwrap());

    let (a, _handle_a) = mock::pair::<&'static str, &'static str>();
    let (b, _handle_b) = mock::pair::<&'static str, &'static str>();
    let mut a = layer.layer(a);
    let b = layer.layer(b);

    ready(&mut a).await;
    let _pending = a.call("held");

    let_dispatch_run().await;
    assert_eq!(a.limiter().active_count(), 1);
    assert_eq!(b.limiter().active_count(), 0);
}

async fn ready(service: &mut FifoLimit<Mock>) {
    poll_fn(|cx| Service::<&'static str>::poll_ready(service, cx))
        .await
        .unwrap();
}

fn new_service(max: usize) -> (FifoLimit<Mock>, Handle) {
    let (service, handle) = mock::pair();
    let service = FifoLimitLayer::new(Concurrency::new(max).unwrap()).layer(service);
    (service, handle)
}
