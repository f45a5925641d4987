mod support;

use loginprobe_e2e::diagnose;

use support::{PageBehavior, SimFactory};

#[tokio::test(start_paused = true)]
async fn test_hardened_page_passes_every_probe() {
    let dir = tempfile::tempdir().unwrap();
    let factory = SimFactory::hardened();

    let lines = diagnose::run(&factory, &support::config(dir.path())).await.unwrap();

    assert_eq!(lines.len(), 8);
    assert!(lines.iter().all(|l| l.ok), "{:#?}", lines);
    assert_eq!(
        lines.iter().map(|l| l.step).collect::<Vec<_>>(),
        (1..=8).collect::<Vec<_>>()
    );
    assert_eq!(lines[1].detail, "Email error displayed: 'Email is required'");
    assert!(lines[4].title.starts_with("SHORT EMAIL - 10 chars"));
    assert!(lines[5].title.starts_with("LONG EMAIL - 51 chars"));
    assert!(lines[6].title.starts_with("MAX VALID EMAIL - 50 chars"));
    assert!(factory.all_closed());
}

#[tokio::test(start_paused = true)]
async fn test_deployed_page_misses_length_checks() {
    let dir = tempfile::tempdir().unwrap();
    let factory = SimFactory::as_deployed();

    let lines = diagnose::run(&factory, &support::config(dir.path())).await.unwrap();

    let failed: Vec<usize> = lines.iter().filter(|l| !l.ok).map(|l| l.step).collect();
    assert_eq!(failed, vec![4, 5, 6, 8]);
    assert_eq!(
        lines[4].detail,
        "NO EMAIL ERROR SHOWN (id=emailError is empty)"
    );
}

#[tokio::test(start_paused = true)]
async fn test_missing_error_elements_abort() {
    let dir = tempfile::tempdir().unwrap();
    let factory = SimFactory::new(PageBehavior {
        has_error_elements: false,
        ..PageBehavior::hardened()
    });

    let lines = diagnose::run(&factory, &support::config(dir.path())).await.unwrap();

    assert_eq!(lines.len(), 1);
    assert!(!lines[0].ok);
    assert_eq!(lines[0].detail, "missing: emailError, passwordError");
    assert!(factory.all_closed());
}
