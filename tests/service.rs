mod common;

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use common::{ATTENDANCE_SHEET, SAMPLE_SHEET};
use sheetfeed::config::Config;
use sheetfeed::error::Error;
use sheetfeed::series::{SeriesPoint, SumColumns, fallback_series};
use sheetfeed::service::SheetService;
use sheetfeed::source::TextSource;

/// In-memory source that records how many times it was asked for the body.
#[derive(Clone)]
struct TestSource {
    body: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl TestSource {
    fn ok(body: &str) -> Self {
        TestSource {
            body: Some(body.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing() -> Self {
        TestSource {
            body: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextSource for TestSource {
    async fn fetch_text(&self) -> Result<String, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.body {
            Some(body) => Ok(body.clone()),
            None => Err(Error::Transport("wire down".to_string())),
        }
    }
}

fn point(category: &str, value: f64) -> SeriesPoint {
    SeriesPoint::new(category, value)
}

#[tokio::test]
async fn series_normalizes_a_category_value_sheet() {
    let source = TestSource::ok(SAMPLE_SHEET);
    let service = SheetService::new(Some(source), Config::default());
    let series = service.series().await;
    assert_eq!(series, vec![point("A", 12.0), point("B", 19.0)]);
}

#[tokio::test]
async fn series_with_sum_columns_all_counts_filled_cells() {
    let source = TestSource::ok(ATTENDANCE_SHEET);
    let config = Config {
        sum_columns: Some(SumColumns::All),
        ..Config::default()
    };
    let service = SheetService::new(Some(source), config);
    let series = service.series().await;
    assert_eq!(series, vec![point("X", 1.0), point("Y", 1.0)]);
}

#[tokio::test]
async fn series_is_cached_within_the_ttl() {
    let source = TestSource::ok(SAMPLE_SHEET);
    let handle = source.clone();
    let service = SheetService::new(Some(source), Config::default());

    let first = service.series().await;
    let second = service.series().await;
    assert_eq!(first, second);
    assert_eq!(handle.calls(), 1);
}

#[tokio::test]
async fn zero_ttl_fetches_on_every_series_call() {
    let source = TestSource::ok(SAMPLE_SHEET);
    let handle = source.clone();
    let config = Config {
        cache_ttl_seconds: 0,
        ..Config::default()
    };
    let service = SheetService::new(Some(source), config);

    service.series().await;
    service.series().await;
    assert_eq!(handle.calls(), 2);
}

#[tokio::test]
async fn failing_source_degrades_to_the_fallback_without_retrying() {
    let source = TestSource::failing();
    let handle = source.clone();
    let service = SheetService::new(Some(source), Config::default());

    assert_eq!(service.series().await, fallback_series());
    assert_eq!(service.series().await, fallback_series());
    assert_eq!(handle.calls(), 1);
}

#[tokio::test]
async fn unconfigured_source_serves_the_fallback_without_fetching() {
    let service: SheetService<TestSource> = SheetService::new(None, Config::default());
    assert_eq!(service.series().await, fallback_series());
}

#[tokio::test]
async fn header_row_override_discards_the_preamble() {
    let body = "Relat\u{f3}rio mensal\n\nCategoria,Valor\nA,12\nB,19\n";
    let source = TestSource::ok(body);
    let config = Config {
        header_row: Some(3),
        ..Config::default()
    };
    let service = SheetService::new(Some(source), config);
    let series = service.series().await;
    assert_eq!(series, vec![point("A", 12.0), point("B", 19.0)]);
}

#[tokio::test]
async fn column_hints_flow_through_to_resolution() {
    let body = "id,nome,nota,turma\n1,Ana,\"8,7\",1A\n2,Bruno,\"9,1\",1A\n";
    let source = TestSource::ok(body);
    let config = Config {
        category_column: Some("nome".to_string()),
        value_column: Some("3".to_string()),
        ..Config::default()
    };
    let service = SheetService::new(Some(source), config);
    let series = service.series().await;
    assert_eq!(series, vec![point("Ana", 8.7), point("Bruno", 9.1)]);
}

#[tokio::test]
async fn cells_reads_by_reference_and_recovers_bad_ones() {
    let body = "h\n\n\n\n\nB6 is not here,but this is\n";
    let source = TestSource::ok(body);
    let service = SheetService::new(Some(source), Config::default());
    let refs = vec!["B6".to_string(), "6B".to_string()];
    let cells = service.cells(&refs).await.expect("cells");
    assert_eq!(
        cells,
        vec![
            ("B6".to_string(), Some("but this is".to_string())),
            ("6B".to_string(), None),
        ]
    );
}

#[tokio::test]
async fn cells_answer_in_request_order() {
    let body = "a1,b1\na2,b2\n";
    let source = TestSource::ok(body);
    let service = SheetService::new(Some(source), Config::default());
    let refs = vec!["B2".to_string(), "A1".to_string(), "B1".to_string()];
    let cells = service.cells(&refs).await.expect("cells");
    let order = cells.iter().map(|(r, _)| r.as_str()).collect::<Vec<_>>();
    assert_eq!(order, vec!["B2", "A1", "B1"]);
}

#[tokio::test]
async fn cells_propagates_transport_errors() {
    let source = TestSource::failing();
    let service = SheetService::new(Some(source), Config::default());
    let refs = vec!["A1".to_string()];
    assert!(matches!(
        service.cells(&refs).await,
        Err(Error::Transport(_))
    ));
}

#[tokio::test]
async fn cells_are_not_cached() {
    let source = TestSource::ok("a,b\n");
    let handle = source.clone();
    let service = SheetService::new(Some(source), Config::default());
    let refs = vec!["A1".to_string()];
    service.cells(&refs).await.expect("cells");
    service.cells(&refs).await.expect("cells");
    assert_eq!(handle.calls(), 2);
}

#[tokio::test]
async fn range_uses_the_configured_header_row_for_labels() {
    let body = "x,x,x\nx,Name,Score\nx,Ana,8\nx,Bruno,9\n";
    let source = TestSource::ok(body);
    let config = Config {
        header_row: Some(2),
        ..Config::default()
    };
    let service = SheetService::new(Some(source), config);
    let range = service.range("B3", "C4").await.expect("range");
    assert_eq!(range.headers, vec!["Name", "Score"]);
    assert_eq!(
        range.rows,
        vec![
            vec!["Ana".to_string(), "8".to_string()],
            vec!["Bruno".to_string(), "9".to_string()],
        ]
    );
}

#[tokio::test]
async fn range_with_no_source_is_a_transport_error() {
    let service: SheetService<TestSource> = SheetService::new(None, Config::default());
    assert!(matches!(
        service.range("A1", "B2").await,
        Err(Error::Transport(_))
    ));
}
