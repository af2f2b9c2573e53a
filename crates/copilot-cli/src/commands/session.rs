use anyhow::{Context, Result};
use copilot_application::SessionService;
use copilot_core::processing::PiiMode;
use copilot_core::upload::FileUpload;

pub async fn clear(service: &SessionService) -> Result<()> {
    service.reset().await.context("Failed to clear session")?;
    println!("Session cleared.");
    Ok(())
}

pub async fn add_upload(service: &SessionService, name: String, size: u64) -> Result<()> {
    let upload = FileUpload::new(name, size);
    let id = upload.id.clone();
    let count = service
        .update(|store| {
            store.add_uploaded_files(vec![upload]);
            store.uploaded_files().len()
        })
        .await;
    service.flush().await.context("Failed to save session")?;
    println!("Added upload {id} ({count} total).");
    Ok(())
}

pub async fn set_config(
    service: &SessionService,
    azure: Option<bool>,
    gemini: Option<bool>,
    pii_mode: Option<PiiMode>,
) -> Result<()> {
    let config = service
        .update(|store| {
            let mut config = *store.processing_config();
            if let Some(azure) = azure {
                config.enable_azure = azure;
            }
            if let Some(gemini) = gemini {
                config.enable_gemini = gemini;
            }
            if let Some(mode) = pii_mode {
                config.pii_mode = mode;
            }
            store.set_processing_config(config);
            config
        })
        .await;
    service.flush().await.context("Failed to save session")?;
    println!(
        "Processing: azure={} gemini={} pii={}",
        config.enable_azure, config.enable_gemini, config.pii_mode
    );
    Ok(())
}
