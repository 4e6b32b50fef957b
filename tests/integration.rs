use std::sync::Arc;
use std::time::Duration;
use vector_art_generator::{
    app::{Workflow, WorkflowServices, WorkflowState},
    download::{DownloadChain, DownloadOutcome, DirectFetch, ReencodeDisplayed},
    jobs::{JobPoller, MockJobClient},
    media::{MediaKind, MockMediaClient},
    models::{Config, JobStatus, SourceFile},
    progress::{RecordingProgress, Stage},
    retry::RecordingSleeper,
    storage::MockStorageClient,
    Error,
};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_ID: &str = "user-7";

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 90, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn config_for(server: &MockServer, max_polls: usize) -> Config {
    Config {
        user_id: USER_ID.to_string(),
        project_id: "dressr".to_string(),
        storage_api_url: server.uri(),
        asset_base_url: format!("{}/assets", server.uri()),
        generation_api_url: server.uri(),
        effect_id: "photoToVectorArt".to_string(),
        poll_interval: Duration::from_millis(1),
        max_polls,
        http_timeout: Duration::from_secs(5),
        debug: false,
    }
}

async fn mount_storage(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/media/get-upload-url"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(format!("{}/signed-put", server.uri())),
        )
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/signed-put"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/image-gen"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "jobId": "job-1", "status": "queued" })),
        )
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, body: serde_json::Value, times: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path(format!("/image-gen/{}/job-1/status", USER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body));
    match times {
        Some(n) => mock.up_to_n_times(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

async fn status_request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().ends_with("/status"))
        .count()
}

#[tokio::test]
async fn test_full_workflow_over_http() {
    let server = MockServer::start().await;
    mount_storage(&server).await;
    let result_url = format!("{}/results/vector.png", server.uri());

    mount_status(&server, serde_json::json!({ "status": "queued" }), Some(1)).await;
    mount_status(&server, serde_json::json!({ "status": "processing" }), Some(1)).await;
    mount_status(
        &server,
        serde_json::json!({ "status": "completed", "result": [{ "image": result_url }] }),
        None,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/results/vector.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png(8, 4)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut workflow = Workflow::from_config(&config_for(&server, 60)).unwrap();

    let upload = workflow
        .select_file(&SourceFile::new("holiday.jpeg", "image/jpeg", vec![0xFF, 0xD8, 0xFF]))
        .await
        .unwrap()
        .clone();
    assert!(upload
        .public_url
        .starts_with(&format!("{}/assets/media/", server.uri())));
    assert!(upload.public_url.ends_with(".jpeg"));

    let rendered = workflow.generate().await.unwrap().unwrap().clone();
    assert_eq!(rendered.url, result_url);
    assert_eq!(rendered.kind, MediaKind::Image);
    assert_eq!(status_request_count(&server).await, 3);

    let outcome = workflow.download(dir.path()).await.unwrap().unwrap();
    match outcome {
        DownloadOutcome::Saved { path, strategy } => {
            assert_eq!(strategy, "direct");
            assert_eq!(std::fs::read(path).unwrap(), png(8, 4));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let submitted = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.url.path() == "/image-gen")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&submitted.body).unwrap();
    assert_eq!(body["imageUrl"], upload.public_url.as_str());
    assert_eq!(body["userId"], USER_ID);
}

#[tokio::test]
async fn test_http_job_failure_is_reported() {
    let server = MockServer::start().await;
    mount_storage(&server).await;
    mount_status(
        &server,
        serde_json::json!({ "status": "error", "error": "Model overloaded" }),
        None,
    )
    .await;

    let mut workflow = Workflow::from_config(&config_for(&server, 60)).unwrap();
    workflow
        .select_file(&SourceFile::new("a.png", "image/png", png(1, 1)))
        .await
        .unwrap();

    let err = workflow.generate().await.unwrap_err();
    assert!(matches!(err, Error::JobFailed(ref m) if m == "Model overloaded"));
    assert_eq!(status_request_count(&server).await, 1);
    assert!(workflow.can_generate());
}

#[tokio::test]
async fn test_http_polling_times_out_without_extra_request() {
    let server = MockServer::start().await;
    mount_storage(&server).await;
    mount_status(&server, serde_json::json!({ "status": "processing" }), None).await;

    let mut workflow = Workflow::from_config(&config_for(&server, 5)).unwrap();
    workflow
        .select_file(&SourceFile::new("a.png", "image/png", png(1, 1)))
        .await
        .unwrap();

    let err = workflow.generate().await.unwrap_err();
    assert!(matches!(err, Error::JobTimeout { polls: 5 }));
    assert_eq!(status_request_count(&server).await, 5);
    assert_eq!(workflow.state(), WorkflowState::Failed);
}

#[tokio::test]
async fn test_http_upload_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex("^/media/.*"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut workflow = Workflow::from_config(&config_for(&server, 60)).unwrap();
    let err = workflow
        .select_file(&SourceFile::new("a.png", "image/png", png(1, 1)))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Upload failed: Failed to get signed URL: Unauthorized");
}

#[tokio::test]
async fn test_mocked_workflow_reencodes_when_result_cannot_be_refetched() {
    let result_url = "https://results.test/out.png";
    let media = MockMediaClient::new()
        .with_body(result_url, png(10, 10))
        .with_failure(result_url);
    let progress = RecordingProgress::new();
    let sleeper = RecordingSleeper::new();
    let jobs = MockJobClient::new()
        .with_status(JobStatus::Queued)
        .with_status(JobStatus::Processing)
        .with_completed(result_url);

    let mut workflow = Workflow::with_services(
        WorkflowServices {
            storage: Box::new(MockStorageClient::new()),
            jobs: Box::new(jobs.clone()),
            media: Arc::new(media),
            progress: Box::new(progress.clone()),
        },
        JobPoller::default().with_sleeper(Arc::new(sleeper.clone())),
    );

    workflow
        .select_file(&SourceFile::new("a.png", "image/png", png(1, 1)))
        .await
        .unwrap();
    workflow.generate().await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let outcome = workflow.download(dir.path()).await.unwrap().unwrap();

    assert!(matches!(outcome, DownloadOutcome::Saved { strategy: "re-encode", .. }));
    assert_eq!(jobs.get_status_count(), 3);
    assert_eq!(sleeper.get_sleeps(), vec![Duration::from_secs(2); 2]);
    assert_eq!(progress.last(), Some(Stage::Complete));
}

#[tokio::test]
async fn test_download_chain_without_handoff_surfaces_every_failure() {
    let result_url = "https://results.test/clip.mp4";
    let media = Arc::new(MockMediaClient::new().with_failure(result_url));
    let jobs = MockJobClient::new().with_completed(result_url);

    let mut workflow = Workflow::with_services(
        WorkflowServices {
            storage: Box::new(MockStorageClient::new()),
            jobs: Box::new(jobs),
            media: media.clone(),
            progress: Box::new(RecordingProgress::new()),
        },
        JobPoller::default().with_sleeper(Arc::new(RecordingSleeper::new())),
    )
    .with_download_chain(DownloadChain::new(vec![
        Box::new(DirectFetch::new(media)),
        Box::new(ReencodeDisplayed),
    ]));

    workflow
        .select_file(&SourceFile::new("a.png", "image/png", png(1, 1)))
        .await
        .unwrap();
    let rendered = workflow.generate().await.unwrap().unwrap();
    assert_eq!(rendered.kind, MediaKind::Video);

    let dir = tempfile::tempdir().unwrap();
    let err = workflow.download(dir.path()).await.unwrap_err();

    match err {
        Error::Download { failures } => {
            assert_eq!(failures.len(), 2);
            assert!(failures[0].starts_with("direct:"));
            assert!(failures[1].starts_with("re-encode:"));
        }
        other => panic!("unexpected error: {}", other),
    }
}
