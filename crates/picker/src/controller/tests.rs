use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::time::{advance, timeout};

use super::*;

#[derive(Clone)]
enum Reply<T> {
	Value(Result<T, FetchError>),
	Panic,
}

#[derive(Clone)]
struct Scripted<T> {
	delay: Duration,
	reply: Reply<T>,
}

/// Collaborator fake answering per key with a scripted delay and reply.
struct Script<T> {
	replies: HashMap<String, Scripted<T>>,
	fallback: Scripted<T>,
	calls: Mutex<Vec<String>>,
}

impl<T: Clone> Script<T> {
	fn new(fallback: Result<T, FetchError>) -> Self {
		Self {
			replies: HashMap::new(),
			fallback: Scripted {
				delay: Duration::ZERO,
				reply: Reply::Value(fallback),
			},
			calls: Mutex::new(Vec::new()),
		}
	}

	fn reply(mut self, key: &str, delay_ms: u64, result: Result<T, FetchError>) -> Self {
		self.replies.insert(
			key.to_string(),
			Scripted {
				delay: Duration::from_millis(delay_ms),
				reply: Reply::Value(result),
			},
		);
		self
	}

	fn panic_on(mut self, key: &str) -> Self {
		self.replies.insert(
			key.to_string(),
			Scripted {
				delay: Duration::ZERO,
				reply: Reply::Panic,
			},
		);
		self
	}

	fn calls(&self) -> Vec<String> {
		self.calls.lock().unwrap().clone()
	}

	async fn call(&self, key: &str) -> Result<T, FetchError> {
		self.calls.lock().unwrap().push(key.to_string());
		let scripted = self.replies.get(key).unwrap_or(&self.fallback).clone();
		tokio::time::sleep(scripted.delay).await;
		match scripted.reply {
			Reply::Value(result) => result,
			Reply::Panic => panic!("scripted collaborator panic for {key:?}"),
		}
	}
}

#[async_trait]
impl DirectoryService for Script<Vec<Entity>> {
	async fn search_entities(&self, query: &str) -> Result<Vec<Entity>, FetchError> {
		self.call(query).await
	}
}

#[async_trait]
impl AssetService for Script<AssetRef> {
	async fn fetch_asset(&self, lookup_key: &str) -> Result<AssetRef, FetchError> {
		self.call(lookup_key).await
	}
}

fn directory() -> Script<Vec<Entity>> {
	Script::new(Ok(Vec::new()))
}

fn assets() -> Script<AssetRef> {
	Script::new(Ok(AssetRef::Absent))
}

fn mit() -> Entity {
	Entity::new("MIT", Some("mit.edu".to_string())).with_country("United States")
}

fn harvard() -> Entity {
	Entity::new("Harvard University", Some("harvard.edu".to_string()))
}

fn server_error(url: &str) -> FetchError {
	FetchError::Status {
		status: 500,
		url: url.to_string(),
	}
}

fn controller(directory: &Arc<Script<Vec<Entity>>>, assets: &Arc<Script<AssetRef>>) -> PickerController {
	PickerController::new(directory.clone(), assets.clone(), PickerConfig::default())
}

const fn search(sequence: u64) -> (RequestKind, u64) {
	(RequestKind::Search, sequence)
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn initialize_lists_everything() {
	let directory = Arc::new(directory().reply("", 10, Ok(vec![mit()])));
	let assets = Arc::new(assets());
	let mut picker = controller(&directory, &assets);

	let issued = picker.initialize();
	assert_eq!(issued, Transition::Pending { kind: RequestKind::Search, sequence: 1 });
	assert!(picker.state().loading());

	let applied = picker.next_transition().await;
	assert_eq!(applied, Some(Transition::Applied { kind: RequestKind::Search, sequence: 1 }));
	assert_eq!(picker.state().entities(), &[mit()]);
	assert!(!picker.state().loading());
	assert_eq!(picker.state().error(), None);
	assert_eq!(directory.calls(), vec![String::new()]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn typing_burst_issues_single_search() {
	let directory = Arc::new(directory().reply("ab", 0, Ok(vec![harvard()])));
	let assets = Arc::new(assets());
	let mut picker = controller(&directory, &assets);

	picker.on_query_changed("a");
	advance(Duration::from_millis(100)).await;
	picker.on_query_changed("ab");

	let transitions = picker.settle().await;
	assert_eq!(
		transitions.iter().map(|t| (t.kind(), t.sequence())).collect::<Vec<_>>(),
		vec![search(1), search(1)]
	);
	assert!(matches!(transitions[1], Transition::Applied { .. }));
	assert_eq!(directory.calls(), vec!["ab".to_string()]);
	assert_eq!(picker.state().entities(), &[harvard()]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn query_is_not_searched_before_quiet_period() {
	let directory = Arc::new(directory());
	let assets = Arc::new(assets());
	let mut picker = controller(&directory, &assets);

	picker.on_query_changed("mit");
	assert!(timeout(Duration::from_millis(499), picker.next_transition()).await.is_err());
	assert!(directory.calls().is_empty());
	assert!(!picker.is_idle());

	let committed = picker.next_transition().await;
	assert_eq!(committed, Some(Transition::Pending { kind: RequestKind::Search, sequence: 1 }));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn late_response_for_older_search_is_discarded() {
	let x = Entity::new("X College", Some("x.edu".to_string()));
	let y = Entity::new("Y College", Some("y.edu".to_string()));
	let directory = Arc::new(directory().reply("x", 200, Ok(vec![x])).reply("y", 50, Ok(vec![y.clone()])));
	let assets = Arc::new(assets());
	let mut picker = controller(&directory, &assets);

	picker.execute_search("x");
	picker.execute_search("y");
	assert_eq!(picker.in_flight(RequestKind::Search), 2);

	let first = picker.next_transition().await;
	assert_eq!(first, Some(Transition::Applied { kind: RequestKind::Search, sequence: 2 }));
	assert_eq!(picker.state().entities(), &[y.clone()]);

	let second = picker.next_transition().await;
	assert_eq!(second, Some(Transition::Discarded { kind: RequestKind::Search, sequence: 1 }));
	assert_eq!(picker.state().entities(), &[y]);
	assert!(!picker.state().loading());
	assert!(picker.is_idle());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn early_response_for_older_search_keeps_loading() {
	let directory = Arc::new(
		directory()
			.reply("x", 10, Ok(vec![mit()]))
			.reply("y", 100, Ok(vec![harvard()])),
	);
	let assets = Arc::new(assets());
	let mut picker = controller(&directory, &assets);

	picker.execute_search("x");
	picker.execute_search("y");

	let first = picker.next_transition().await;
	assert_eq!(first, Some(Transition::Discarded { kind: RequestKind::Search, sequence: 1 }));
	assert!(picker.state().loading());
	assert!(picker.state().entities().is_empty());

	let second = picker.next_transition().await;
	assert_eq!(second, Some(Transition::Applied { kind: RequestKind::Search, sequence: 2 }));
	assert_eq!(picker.state().entities(), &[harvard()]);
	assert!(!picker.state().loading());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn stale_failure_is_silent() {
	let directory = Arc::new(
		directory()
			.reply("x", 200, Err(server_error("x")))
			.reply("y", 10, Ok(vec![mit()])),
	);
	let assets = Arc::new(assets());
	let mut picker = controller(&directory, &assets);

	picker.execute_search("x");
	picker.execute_search("y");
	picker.settle().await;

	assert_eq!(picker.state().error(), None);
	assert_eq!(picker.state().entities(), &[mit()]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn failed_search_keeps_previous_entities() {
	let directory = Arc::new(
		directory()
			.reply("", 0, Ok(vec![mit(), harvard()]))
			.reply("boom", 0, Err(server_error("boom"))),
	);
	let assets = Arc::new(assets());
	let mut picker = controller(&directory, &assets);

	picker.initialize();
	picker.settle().await;
	let before = picker.state().entities().to_vec();

	picker.execute_search("boom");
	let failed = picker.next_transition().await;

	assert_eq!(failed, Some(Transition::Failed { kind: RequestKind::Search, sequence: 2 }));
	assert_eq!(picker.state().entities(), before.as_slice());
	assert!(!picker.state().loading());
	assert_eq!(
		picker.state().error(),
		Some(&PickerError::SearchFailed {
			query: "boom".to_string(),
			cause: server_error("boom"),
		})
	);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn new_search_clears_error_when_issued() {
	let directory = Arc::new(directory().reply("boom", 0, Err(server_error("boom"))));
	let assets = Arc::new(assets());
	let mut picker = controller(&directory, &assets);

	picker.execute_search("boom");
	picker.settle().await;
	assert!(picker.state().error().is_some());

	picker.execute_search("fine");
	assert_eq!(picker.state().error(), None);
	assert!(picker.state().loading());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn failed_search_keeps_selection_and_asset() {
	let logo = AssetRef::Resolved("https://logo.example/mit.edu".to_string());
	let directory = Arc::new(
		directory()
			.reply("", 0, Ok(vec![mit()]))
			.reply("boom", 0, Err(server_error("boom"))),
	);
	let assets = Arc::new(assets().reply("mit.edu", 0, Ok(logo.clone())));
	let mut picker = controller(&directory, &assets);

	picker.initialize();
	picker.settle().await;
	picker.select_index(0).unwrap();
	picker.settle().await;

	picker.execute_search("boom");
	picker.settle().await;

	assert_eq!(picker.state().selection(), Some(&mit()));
	assert_eq!(picker.state().asset(), Some(&logo));
	assert_eq!(picker.state().error().map(PickerError::kind), Some(RequestKind::Search));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn selection_resets_asset_synchronously() {
	let directory = Arc::new(directory());
	let assets = Arc::new(
		assets()
			.reply("mit.edu", 0, Ok(AssetRef::Resolved("https://logo.example/mit.edu".to_string())))
			.reply("harvard.edu", 100, Ok(AssetRef::Resolved("https://logo.example/harvard.edu".to_string()))),
	);
	let mut picker = controller(&directory, &assets);

	picker.on_select(Some(mit()));
	picker.settle().await;
	assert!(picker.state().asset().is_some());

	let issued = picker.on_select(Some(harvard()));
	assert_eq!(issued, Some(Transition::Pending { kind: RequestKind::Asset, sequence: 2 }));
	assert_eq!(picker.state().selection(), Some(&harvard()));
	assert_eq!(picker.state().asset(), None);

	picker.settle().await;
	assert_eq!(
		picker.state().asset().and_then(AssetRef::locator),
		Some("https://logo.example/harvard.edu")
	);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn absent_asset_is_not_an_error() {
	let directory = Arc::new(directory());
	let assets = Arc::new(assets().reply("mit.edu", 0, Ok(AssetRef::Absent)));
	let mut picker = controller(&directory, &assets);

	picker.on_select(Some(mit()));
	let applied = picker.next_transition().await;

	assert_eq!(applied, Some(Transition::Applied { kind: RequestKind::Asset, sequence: 1 }));
	assert_eq!(picker.state().asset(), Some(&AssetRef::Absent));
	assert_eq!(picker.state().error(), None);
	assert_eq!(assets.calls(), vec!["mit.edu".to_string()]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn failed_asset_lookup_sets_error_only() {
	let cause = FetchError::Transport("connection refused".to_string());
	let directory = Arc::new(directory().reply("", 0, Ok(vec![mit()])));
	let assets = Arc::new(assets().reply("mit.edu", 0, Err(cause.clone())));
	let mut picker = controller(&directory, &assets);

	picker.initialize();
	picker.settle().await;
	picker.select_index(0).unwrap();
	let failed = picker.next_transition().await;

	assert_eq!(failed, Some(Transition::Failed { kind: RequestKind::Asset, sequence: 1 }));
	assert_eq!(picker.state().asset(), None);
	assert_eq!(picker.state().selection(), Some(&mit()));
	assert_eq!(picker.state().entities(), &[mit()]);
	assert_eq!(
		picker.state().error(),
		Some(&PickerError::AssetLookupFailed {
			key: "mit.edu".to_string(),
			cause,
		})
	);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn clearing_selection_skips_lookup() {
	let directory = Arc::new(directory());
	let assets = Arc::new(assets());
	let mut picker = controller(&directory, &assets);

	assert_eq!(picker.on_select(None), None);
	assert_eq!(picker.state().selection(), None);
	assert_eq!(picker.state().asset(), None);
	assert!(picker.is_idle());
	assert!(assets.calls().is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn entity_without_lookup_key_skips_lookup() {
	let directory = Arc::new(directory());
	let assets = Arc::new(assets());
	let mut picker = controller(&directory, &assets);

	let keyless = Entity::new("Nowhere Institute", Some("  ".to_string()));
	assert_eq!(picker.on_select(Some(keyless.clone())), None);
	assert_eq!(picker.state().selection(), Some(&keyless));
	assert_eq!(picker.state().asset(), None);
	assert_eq!(picker.state().error(), None);
	assert!(assets.calls().is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn rapid_reselection_keeps_latest_asset() {
	let directory = Arc::new(directory());
	let assets = Arc::new(
		assets()
			.reply("mit.edu", 300, Ok(AssetRef::Resolved("https://logo.example/mit.edu".to_string())))
			.reply("harvard.edu", 50, Ok(AssetRef::Absent)),
	);
	let mut picker = controller(&directory, &assets);

	picker.on_select(Some(mit()));
	picker.on_select(Some(harvard()));
	let transitions = picker.settle().await;

	assert_eq!(
		transitions,
		vec![
			Transition::Applied { kind: RequestKind::Asset, sequence: 2 },
			Transition::Discarded { kind: RequestKind::Asset, sequence: 1 },
		]
	);
	assert_eq!(picker.state().selection(), Some(&harvard()));
	assert_eq!(picker.state().asset(), Some(&AssetRef::Absent));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn clearing_selection_discards_inflight_lookup() {
	let directory = Arc::new(directory());
	let assets = Arc::new(assets().reply("mit.edu", 100, Ok(AssetRef::Absent)));
	let mut picker = controller(&directory, &assets);

	picker.on_select(Some(mit()));
	picker.on_select(None);
	let transitions = picker.settle().await;

	assert_eq!(transitions, vec![Transition::Discarded { kind: RequestKind::Asset, sequence: 1 }]);
	assert_eq!(picker.state().asset(), None);
	assert_eq!(picker.state().latest_asset_seq(), 2);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn asset_success_clears_asset_error_only() {
	let directory = Arc::new(directory().reply("boom", 0, Err(server_error("boom"))));
	let assets = Arc::new(
		assets()
			.reply("mit.edu", 0, Err(FetchError::Transport("reset".to_string())))
			.reply("harvard.edu", 0, Ok(AssetRef::Absent)),
	);
	let mut picker = controller(&directory, &assets);

	picker.on_select(Some(mit()));
	picker.settle().await;
	assert_eq!(picker.state().error().map(PickerError::kind), Some(RequestKind::Asset));

	picker.on_select(Some(harvard()));
	picker.settle().await;
	assert_eq!(picker.state().error(), None);

	picker.execute_search("boom");
	picker.settle().await;
	picker.on_select(Some(harvard()));
	picker.settle().await;
	assert_eq!(picker.state().error().map(PickerError::kind), Some(RequestKind::Search));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn panicking_collaborator_becomes_failure() {
	let directory = Arc::new(directory());
	let assets = Arc::new(assets().panic_on("mit.edu"));
	let mut picker = controller(&directory, &assets);

	picker.on_select(Some(mit()));
	let failed = picker.next_transition().await;

	assert_eq!(failed, Some(Transition::Failed { kind: RequestKind::Asset, sequence: 1 }));
	assert!(matches!(
		picker.state().error(),
		Some(PickerError::AssetLookupFailed {
			cause: FetchError::Panicked(_),
			..
		})
	));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn select_index_rejects_unlisted_entities() {
	let directory = Arc::new(directory().reply("", 0, Ok(vec![mit()])));
	let assets = Arc::new(assets());
	let mut picker = controller(&directory, &assets);

	picker.initialize();
	picker.settle().await;

	assert_eq!(picker.select_index(3), Err(SelectError::OutOfRange { index: 3, len: 1 }));
	assert_eq!(picker.state().selection(), None);
	assert_eq!(picker.state().latest_asset_seq(), 0);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn shutdown_discards_pending_query_and_results() {
	let directory = Arc::new(directory().reply("", 100, Ok(vec![mit()])));
	let assets = Arc::new(assets());
	let mut picker = controller(&directory, &assets);

	picker.initialize();
	picker.on_query_changed("mi");
	picker.shutdown();

	assert!(picker.is_idle());
	assert_eq!(picker.next_transition().await, None);

	advance(Duration::from_secs(1)).await;
	assert_eq!(picker.next_transition().await, None);
	assert!(picker.state().entities().is_empty());
	assert!(!directory.calls().contains(&"mi".to_string()));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn controllers_keep_independent_sequences() {
	let directory = Arc::new(directory());
	let assets = Arc::new(assets());
	let mut first = controller(&directory, &assets);
	let mut second = controller(&directory, &assets);

	first.execute_search("a");
	first.execute_search("b");
	let issued = second.execute_search("c");

	assert_eq!(issued.sequence(), 1);
	assert_eq!(first.state().latest_search_seq(), 2);
	first.settle().await;
	second.settle().await;
	assert!(!second.state().loading());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn drain_applies_only_queued_events() {
	let directory = Arc::new(directory().reply("", 0, Ok(vec![mit()])));
	let assets = Arc::new(assets());
	let mut picker = controller(&directory, &assets);

	picker.initialize();
	assert!(picker.drain().is_empty());

	// The scripted search resolves immediately; sleeping lets it complete and queue.
	tokio::time::sleep(Duration::from_millis(10)).await;

	assert_eq!(picker.drain(), vec![Transition::Applied { kind: RequestKind::Search, sequence: 1 }]);
	assert_eq!(picker.state().entities(), &[mit()]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn settle_waits_for_slow_search() {
	let directory = Arc::new(directory().reply("", 5_000, Ok(vec![mit()])));
	let assets = Arc::new(assets());
	let mut picker = controller(&directory, &assets);

	picker.initialize();
	assert!(picker.drain().is_empty());
	assert!(!picker.is_idle());
	assert_eq!(picker.in_flight(RequestKind::Search), 1);

	let settled = picker.settle().await;
	assert_eq!(settled, vec![Transition::Applied { kind: RequestKind::Search, sequence: 1 }]);
	assert_eq!(picker.state().entities(), &[mit()]);
	assert_eq!(picker.in_flight(RequestKind::Search), 0);
	assert!(picker.is_idle());
}
