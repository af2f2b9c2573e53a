use anyhow::{Context, Result};
use copilot_application::SessionService;
use copilot_core::session::{SessionState, view};
use serde_json::json;

pub async fn run(service: &SessionService, as_json: bool) -> Result<()> {
    let state = service.snapshot().await;
    if as_json {
        let output = serde_json::to_string_pretty(&to_json(&state))
            .context("Failed to serialize session")?;
        println!("{output}");
    } else {
        print_summary(&state);
    }
    Ok(())
}

fn to_json(state: &SessionState) -> serde_json::Value {
    let selected: Vec<&str> = view::selected_documents(state)
        .into_iter()
        .map(|doc| doc.id.as_str())
        .collect();
    json!({
        "session": state.to_persisted(),
        "activePage": state.active_page,
        "status": state.processing.label(),
        "currentBatch": state.processing.batch(),
        "selectedDocumentIds": selected,
        "views": {
            "hasUploadedFiles": view::has_uploaded_files(state),
            "hasProcessedDocuments": view::has_processed_documents(state),
            "processingProgress": view::processing_progress(state),
            "uploadedBytes": view::uploaded_bytes(state),
            "failedUploads": view::failed_uploads(state).len(),
        },
    })
}

fn print_summary(state: &SessionState) {
    let config = &state.processing_config;
    println!("Active page:  {}", state.active_page);
    println!("Status:       {}", state.processing.label());
    println!(
        "Processing:   azure={} gemini={} pii={}",
        config.enable_azure, config.enable_gemini, config.pii_mode
    );
    println!(
        "Uploads:      {} ({} bytes, {} failed)",
        state.uploaded_files.len(),
        view::uploaded_bytes(state),
        view::failed_uploads(state).len()
    );
    for upload in &state.uploaded_files {
        println!("  {}  {}  {} bytes  [{}]", upload.id, upload.name, upload.size, upload.status);
    }
    println!(
        "Documents:    {} ({} selected)",
        state.processed_documents.len(),
        view::selected_documents(state).len()
    );
    for doc in &state.processed_documents {
        println!("  {}  {}  {}", doc.id, doc.file_name, doc.document_type);
    }
    match &state.workpaper_metadata {
        Some(meta) => println!(
            "Workpaper:    {} - {} ({})",
            meta.workpaper_id, meta.client_name, meta.tax_year
        ),
        None => println!("Workpaper:    none"),
    }
}
