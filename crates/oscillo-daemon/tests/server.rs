#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::future::pending;
use std::io;
use std::time::Duration;

use tokio::time::timeout;

use oscillo_core::error::{ErrorKind, OscilloError, Result};
use oscillo_daemon::config::DaemonConfig;
use oscillo_daemon::server::{run, supervise};

#[tokio::test]
async fn bind_conflict_is_fatal() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let mut cfg = DaemonConfig::default();
    cfg.server.listen = format!("127.0.0.1:{port}");

    let err = timeout(Duration::from_secs(5), run(cfg))
        .await
        .expect("a taken port must fail fast, not serve")
        .expect_err("bind on a taken port");
    assert_eq!(err.kind(), ErrorKind::ListenerBind);
    assert!(err.is_fatal());
    assert!(err.to_string().contains(&port.to_string()), "{err}");
}

#[tokio::test]
async fn sampler_error_ends_the_daemon() {
    let sampler = tokio::spawn(async {
        Err(OscilloError::LabelArityMismatch {
            name: "oscillo_sample".into(),
            expected: 1,
            got: 2,
        })
    });

    let err = supervise(pending::<io::Result<()>>(), sampler).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LabelArityMismatch);
    assert!(err.is_fatal());
}

#[tokio::test]
async fn sampler_panic_ends_the_daemon() {
    let sampler = tokio::spawn(async {
        if true {
            panic!("tick blew up");
        }
        Ok(())
    });

    let err = supervise(pending::<io::Result<()>>(), sampler).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert!(err.to_string().contains("sampler task failed"), "{err}");
}

#[tokio::test]
async fn sampler_returning_is_an_error() {
    let sampler = tokio::spawn(async { Ok(()) });

    let err = supervise(pending::<io::Result<()>>(), sampler).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert!(err.to_string().contains("sampler stopped"), "{err}");
}

#[tokio::test]
async fn server_exit_ends_the_daemon() {
    let err = supervise(async { Ok(()) }, tokio::spawn(pending::<Result<()>>()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert!(err.to_string().contains("listener closed"), "{err}");

    let failed = async { Err(io::Error::other("accept loop died")) };
    let err = supervise(failed, tokio::spawn(pending::<Result<()>>()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert!(err.to_string().contains("accept loop died"), "{err}");
}
