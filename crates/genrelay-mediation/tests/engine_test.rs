//! End-to-end tests for the mediation engine against in-memory fakes.
//!
//! The fakes mirror the production contracts: the entitlement store's
//! increment is a single atomic operation (the Postgres implementation is one
//! UPDATE statement), and the ledger is append-only.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use genrelay_core::constants::{FREE_GENERATION_LIMIT, MAX_DOCUMENT_SIZE_BYTES};
use genrelay_core::models::{
    Capability, EntitlementSnapshot, GenerationRecord, GenerationRequest, NewGeneration,
    ProviderOutput, RejectionReason, Tier,
};
use genrelay_core::{AppError, ErrorMetadata};
use genrelay_db::{EntitlementStore, GenerationLedger};
use genrelay_mediation::{Mediated, MediationEngine};
use genrelay_providers::{AdapterRegistry, ProviderAdapter, ProviderError, ProviderResult};
use uuid::Uuid;

// ----- Fakes -----

#[derive(Default)]
struct FakeEntitlements {
    plans: Mutex<HashMap<String, Tier>>,
    counters: Mutex<HashMap<String, u32>>,
}

impl FakeEntitlements {
    fn with_user(user_id: &str, plan: Tier, free_usage: u32) -> Arc<Self> {
        let store = Self::default();
        store
            .plans
            .lock()
            .unwrap()
            .insert(user_id.to_string(), plan);
        store
            .counters
            .lock()
            .unwrap()
            .insert(user_id.to_string(), free_usage);
        Arc::new(store)
    }

    fn usage(&self, user_id: &str) -> u32 {
        *self.counters.lock().unwrap().get(user_id).unwrap_or(&0)
    }
}

#[async_trait]
impl EntitlementStore for FakeEntitlements {
    async fn resolve(&self, user_id: &str) -> Result<EntitlementSnapshot, AppError> {
        let plan = *self
            .plans
            .lock()
            .unwrap()
            .get(user_id)
            .unwrap_or(&Tier::Free);
        let free_usage = self.usage(user_id);
        Ok(EntitlementSnapshot { plan, free_usage })
    }

    async fn increment_free_usage(&self, user_id: &str) -> Result<u32, AppError> {
        let mut counters = self.counters.lock().unwrap();
        let counter = counters.entry(user_id.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}

#[derive(Default)]
struct FakeLedger {
    records: Mutex<Vec<GenerationRecord>>,
}

impl FakeLedger {
    fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn last(&self) -> GenerationRecord {
        self.records.lock().unwrap().last().unwrap().clone()
    }
}

#[async_trait]
impl GenerationLedger for FakeLedger {
    async fn append(&self, record: NewGeneration) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        self.records.lock().unwrap().push(GenerationRecord {
            id,
            user_id: record.user_id,
            prompt: record.prompt,
            content: record.content,
            kind: record.kind,
            publish: record.publish,
            created_at: chrono::Utc::now(),
        });
        Ok(id)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<GenerationRecord>, AppError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// Ledger that always fails its append, for the persistence-failure path.
struct BrokenLedger;

#[async_trait]
impl GenerationLedger for BrokenLedger {
    async fn append(&self, _record: NewGeneration) -> Result<Uuid, AppError> {
        Err(AppError::Internal("ledger unavailable".to_string()))
    }

    async fn list_for_user(&self, _user_id: &str) -> Result<Vec<GenerationRecord>, AppError> {
        Ok(vec![])
    }
}

/// Adapter returning a fixed output, counting its invocations.
#[derive(Debug)]
struct StubAdapter {
    adapter_name: &'static str,
    serves: &'static [Capability],
    output: ProviderOutput,
    invocations: AtomicUsize,
}

impl StubAdapter {
    fn text(serves: &'static [Capability], content: &str) -> Arc<Self> {
        Arc::new(Self {
            adapter_name: "stub-text",
            serves,
            output: ProviderOutput::Text(content.to_string()),
            invocations: AtomicUsize::new(0),
        })
    }

    fn url(serves: &'static [Capability], url: &str) -> Arc<Self> {
        Arc::new(Self {
            adapter_name: "stub-url",
            serves,
            output: ProviderOutput::Url(url.to_string()),
            invocations: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderAdapter for StubAdapter {
    fn name(&self) -> &str {
        self.adapter_name
    }

    fn capabilities(&self) -> &'static [Capability] {
        self.serves
    }

    async fn invoke(&self, _user_id: &str, _request: &GenerationRequest) -> ProviderResult {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }
}

/// Adapter whose remote call always fails.
#[derive(Debug)]
struct FailingAdapter {
    serves: &'static [Capability],
    error_kind: fn() -> ProviderError,
}

#[async_trait]
impl ProviderAdapter for FailingAdapter {
    fn name(&self) -> &str {
        "failing"
    }

    fn capabilities(&self) -> &'static [Capability] {
        self.serves
    }

    async fn invoke(&self, _user_id: &str, _request: &GenerationRequest) -> ProviderResult {
        Err((self.error_kind)())
    }
}

/// Adapter that never resolves within a short engine timeout.
#[derive(Debug)]
struct SlowAdapter;

#[async_trait]
impl ProviderAdapter for SlowAdapter {
    fn name(&self) -> &str {
        "slow"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Article]
    }

    async fn invoke(&self, _user_id: &str, _request: &GenerationRequest) -> ProviderResult {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(ProviderOutput::Text("too late".to_string()))
    }
}

// ----- Harness -----

struct Harness {
    engine: MediationEngine,
    entitlements: Arc<FakeEntitlements>,
    ledger: Arc<FakeLedger>,
}

async fn harness(
    entitlements: Arc<FakeEntitlements>,
    adapters: Vec<Arc<dyn ProviderAdapter>>,
) -> Harness {
    let registry = AdapterRegistry::new();
    for adapter in adapters {
        registry.register(adapter).await.unwrap();
    }
    let ledger = Arc::new(FakeLedger::default());
    let engine = MediationEngine::new(
        registry,
        entitlements.clone(),
        ledger.clone(),
        Duration::from_secs(5),
    );
    Harness {
        engine,
        entitlements,
        ledger,
    }
}

/// Resolve a fresh snapshot and mediate, the way the router layer does.
async fn submit(h: &Harness, user_id: &str, request: GenerationRequest) -> Result<Mediated, AppError> {
    let snapshot = h.entitlements.resolve(user_id).await.unwrap();
    h.engine.mediate(user_id, snapshot, request).await
}

fn article(prompt: &str) -> GenerationRequest {
    GenerationRequest::Article {
        prompt: prompt.to_string(),
        max_tokens: 500,
    }
}

fn object_removal(object: &str) -> GenerationRequest {
    GenerationRequest::ObjectRemoval {
        image: Bytes::from_static(b"\x89PNG image"),
        filename: "photo.png".to_string(),
        object: object.to_string(),
    }
}

// ----- Quota properties -----

#[tokio::test]
async fn free_tier_gets_exactly_the_limit_sequentially() {
    let store = FakeEntitlements::with_user("user_free", Tier::Free, 0);
    let adapter = StubAdapter::text(&[Capability::Article, Capability::BlogTitle], "text");
    let h = harness(store, vec![adapter]).await;

    let mut successes = 0;
    let mut rejections = 0;
    for i in 0..(FREE_GENERATION_LIMIT + 2) {
        match submit(&h, "user_free", article(&format!("prompt {}", i)))
            .await
            .unwrap()
        {
            Mediated::Generated { .. } => successes += 1,
            Mediated::Rejected(RejectionReason::FreeQuotaExhausted { .. }) => rejections += 1,
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    assert_eq!(successes, FREE_GENERATION_LIMIT);
    assert_eq!(rejections, 2);
    assert_eq!(h.ledger.len() as u32, FREE_GENERATION_LIMIT);
    assert_eq!(h.entitlements.usage("user_free"), FREE_GENERATION_LIMIT);
}

#[tokio::test]
async fn free_tier_gets_exactly_the_limit_concurrently() {
    let store = FakeEntitlements::with_user("user_free", Tier::Free, 0);
    let adapter = StubAdapter::text(&[Capability::Article, Capability::BlogTitle], "text");
    let h = Arc::new(harness(store, vec![adapter]).await);

    // Each task resolves its own fresh snapshot before mediating, exactly
    // like the router does per request; increments are atomic in the store.
    let mut handles = Vec::new();
    for i in 0..30u32 {
        let h = h.clone();
        handles.push(tokio::spawn(async move {
            submit(&h, "user_free", article(&format!("prompt {}", i))).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if let Mediated::Generated { .. } = handle.await.unwrap().unwrap() {
            successes += 1;
        }
    }

    assert_eq!(successes, FREE_GENERATION_LIMIT);
    assert_eq!(h.entitlements.usage("user_free"), FREE_GENERATION_LIMIT);
    assert_eq!(h.ledger.len() as u32, FREE_GENERATION_LIMIT);
}

#[tokio::test]
async fn premium_is_never_quota_rejected_and_never_counted() {
    let store = FakeEntitlements::with_user("user_premium", Tier::Premium, 0);
    let adapter = StubAdapter::text(&[Capability::Article, Capability::BlogTitle], "text");
    let h = harness(store, vec![adapter]).await;

    for i in 0..25 {
        let outcome = submit(&h, "user_premium", article(&format!("p{}", i)))
            .await
            .unwrap();
        assert!(matches!(outcome, Mediated::Generated { .. }));
    }

    assert_eq!(h.ledger.len(), 25);
    // Premium generations never touch the free counter.
    assert_eq!(h.entitlements.usage("user_premium"), 0);
}

#[tokio::test]
async fn exhausted_quota_rejection_is_idempotent() {
    let store = FakeEntitlements::with_user("user_free", Tier::Free, FREE_GENERATION_LIMIT);
    let adapter = StubAdapter::text(&[Capability::Article, Capability::BlogTitle], "text");
    let h = harness(store, vec![adapter.clone()]).await;

    for _ in 0..2 {
        match submit(&h, "user_free", article("one more?")).await.unwrap() {
            Mediated::Rejected(reason) => {
                assert_eq!(reason.message(), "Limit reached. Upgrade to continue.");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    // No side effects either time.
    assert_eq!(adapter.calls(), 0);
    assert_eq!(h.ledger.len(), 0);
    assert_eq!(h.entitlements.usage("user_free"), FREE_GENERATION_LIMIT);
}

#[tokio::test]
async fn free_user_at_nine_crosses_into_rejection() {
    let store = FakeEntitlements::with_user("user_free", Tier::Free, 9);
    let adapter = StubAdapter::text(&[Capability::Article, Capability::BlogTitle], "an article");
    let h = harness(store, vec![adapter]).await;

    // Admitted: adapter runs, record persists, counter reaches the limit.
    match submit(&h, "user_free", article("last free one")).await.unwrap() {
        Mediated::Generated { content, .. } => assert_eq!(content, "an article"),
        other => panic!("expected success, got {:?}", other),
    }
    assert_eq!(h.ledger.len(), 1);
    assert_eq!(h.entitlements.usage("user_free"), 10);

    // Next request from the same user is rejected; the counter stays put.
    match submit(&h, "user_free", article("over the line")).await.unwrap() {
        Mediated::Rejected(reason) => {
            assert_eq!(reason.message(), "Limit reached. Upgrade to continue.")
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert_eq!(h.entitlements.usage("user_free"), 10);
    assert_eq!(h.ledger.len(), 1);
}

// ----- Premium gate -----

#[tokio::test]
async fn free_user_is_gated_from_premium_capabilities() {
    let store = FakeEntitlements::with_user("user_free", Tier::Free, 0);
    let adapter = StubAdapter::url(&[Capability::ImageGeneration], "https://cdn/x.png");
    let h = harness(store, vec![adapter.clone()]).await;

    let request = GenerationRequest::ImageGeneration {
        prompt: "a lighthouse".to_string(),
        publish: false,
    };
    match submit(&h, "user_free", request).await.unwrap() {
        Mediated::Rejected(RejectionReason::PremiumRequired { capability }) => {
            assert_eq!(capability, Capability::ImageGeneration);
        }
        other => panic!("expected premium rejection, got {:?}", other),
    }

    assert_eq!(adapter.calls(), 0);
    assert_eq!(h.entitlements.usage("user_free"), 0);
}

// ----- Failure handling -----

#[tokio::test]
async fn failing_adapter_never_charges_or_records() {
    for error_kind in [
        (|| ProviderError::Remote {
            status: 502,
            detail: "bad gateway".to_string(),
        }) as fn() -> ProviderError,
        || ProviderError::Transport("connection reset".to_string()),
        || ProviderError::MalformedResponse("not json".to_string()),
    ] {
        let store = FakeEntitlements::with_user("user_free", Tier::Free, 3);
        let h = harness(
            store,
            vec![Arc::new(FailingAdapter {
                serves: &[Capability::Article, Capability::BlogTitle],
                error_kind,
            })],
        )
        .await;

        let err = submit(&h, "user_free", article("doomed")).await.unwrap_err();
        assert_eq!(err.error_code(), "PROVIDER_ERROR");

        assert_eq!(h.ledger.len(), 0);
        assert_eq!(h.entitlements.usage("user_free"), 3);
    }
}

#[tokio::test]
async fn timeout_is_distinct_from_hard_failure() {
    let store = FakeEntitlements::with_user("user_free", Tier::Free, 0);
    let registry = AdapterRegistry::new();
    registry.register(Arc::new(SlowAdapter)).await.unwrap();
    let ledger = Arc::new(FakeLedger::default());
    let engine = MediationEngine::new(
        registry,
        store.clone(),
        ledger.clone(),
        Duration::from_millis(20),
    );

    let snapshot = store.resolve("user_free").await.unwrap();
    let err = engine
        .mediate("user_free", snapshot, article("slow"))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "PROVIDER_TIMEOUT");
    assert_eq!(ledger.len(), 0);
    assert_eq!(store.usage("user_free"), 0);
}

#[tokio::test]
async fn persistence_failure_surfaces_and_charges_nothing() {
    let store = FakeEntitlements::with_user("user_free", Tier::Free, 4);
    let registry = AdapterRegistry::new();
    registry
        .register(StubAdapter::text(
            &[Capability::Article, Capability::BlogTitle],
            "text",
        ))
        .await
        .unwrap();
    let engine = MediationEngine::new(
        registry,
        store.clone(),
        Arc::new(BrokenLedger),
        Duration::from_secs(5),
    );

    let snapshot = store.resolve("user_free").await.unwrap();
    let err = engine
        .mediate("user_free", snapshot, article("lost artifact"))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "INTERNAL_ERROR");
    // The failed append never reaches the counting step.
    assert_eq!(store.usage("user_free"), 4);
}

#[tokio::test]
async fn adapter_invalid_input_maps_to_validation_outcome() {
    // The document-review adapter reports an unreadable or too-short
    // document as invalid input; the engine surfaces it as a 400-class
    // error, with no record and no charge.
    let store = FakeEntitlements::with_user("user_premium", Tier::Premium, 0);
    let h = harness(
        store,
        vec![Arc::new(FailingAdapter {
            serves: &[Capability::ResumeReview],
            error_kind: || {
                ProviderError::InvalidInput("Resume text is empty or too short.".to_string())
            },
        })],
    )
    .await;

    let request = GenerationRequest::ResumeReview {
        document: Bytes::from_static(b"%PDF-1.4 nearly empty"),
        filename: "resume.pdf".to_string(),
    };
    let err = submit(&h, "user_premium", request).await.unwrap_err();

    assert_eq!(err.error_code(), "INVALID_INPUT");
    assert_eq!(err.client_message(), "Resume text is empty or too short.");
    assert_eq!(h.ledger.len(), 0);
}

// ----- Validation before invocation -----

#[tokio::test]
async fn multi_word_object_is_rejected_before_any_call() {
    let store = FakeEntitlements::with_user("user_premium", Tier::Premium, 0);
    let adapter = StubAdapter::url(&[Capability::ObjectRemoval], "https://cdn/x.png");
    let h = harness(store, vec![adapter.clone()]).await;

    let err = submit(&h, "user_premium", object_removal("watch spoon"))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "INVALID_INPUT");
    assert_eq!(adapter.calls(), 0);
    assert_eq!(h.ledger.len(), 0);
}

#[tokio::test]
async fn oversize_document_is_rejected_before_extraction() {
    let store = FakeEntitlements::with_user("user_premium", Tier::Premium, 0);
    let adapter = StubAdapter::text(&[Capability::ResumeReview], "review");
    let h = harness(store, vec![adapter.clone()]).await;

    let request = GenerationRequest::ResumeReview {
        document: Bytes::from(vec![0u8; MAX_DOCUMENT_SIZE_BYTES + 1]),
        filename: "huge.pdf".to_string(),
    };
    let err = submit(&h, "user_premium", request).await.unwrap_err();

    assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
    assert_eq!(adapter.calls(), 0);
}

// ----- Round trip -----

#[tokio::test]
async fn record_kind_matches_capability_and_content_round_trips() {
    let store = FakeEntitlements::with_user("user_premium", Tier::Premium, 0);
    let h = harness(
        store,
        vec![
            StubAdapter::text(
                &[Capability::Article, Capability::BlogTitle],
                "generated text",
            ),
            StubAdapter::url(
                &[
                    Capability::ImageGeneration,
                    Capability::BackgroundRemoval,
                    Capability::ObjectRemoval,
                ],
                "https://cdn.example.com/generated.png",
            ),
            StubAdapter::text(&[Capability::ResumeReview], "**Summary** strong"),
        ],
    )
    .await;

    let requests: Vec<GenerationRequest> = vec![
        article("write about ferris"),
        GenerationRequest::BlogTitle {
            prompt: "name my blog".to_string(),
        },
        GenerationRequest::ImageGeneration {
            prompt: "a lighthouse".to_string(),
            publish: true,
        },
        GenerationRequest::BackgroundRemoval {
            image: Bytes::from_static(b"\x89PNG"),
            filename: "a.png".to_string(),
        },
        object_removal("watch"),
        GenerationRequest::ResumeReview {
            document: Bytes::from_static(b"%PDF-1.4"),
            filename: "resume.pdf".to_string(),
        },
    ];

    for request in requests {
        let capability = request.capability();
        let content = match submit(&h, "user_premium", request).await.unwrap() {
            Mediated::Generated { content, .. } => content,
            other => panic!("expected success for {}, got {:?}", capability, other),
        };

        let record = h.ledger.last();
        assert_eq!(record.kind, capability);
        // The content handed back to the caller equals the stored reference.
        assert_eq!(record.content, content);
    }

    // The publish flag survives only where the request carries it.
    let records = h.ledger.list_for_user("user_premium").await.unwrap();
    let image_record = records
        .iter()
        .find(|r| r.kind == Capability::ImageGeneration)
        .unwrap();
    assert!(image_record.publish);
    let article_record = records
        .iter()
        .find(|r| r.kind == Capability::Article)
        .unwrap();
    assert!(!article_record.publish);
}
