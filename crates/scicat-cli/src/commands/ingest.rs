//! Ingest command - extract metadata and register a raw dataset.

use std::path::{Path, PathBuf};

use colored::Colorize;
use log::info;
use scicat::client::{
    DEFAULT_DATASET_TYPE, checksummed_datablock, describe_file, encode_thumbnail, get_file_size,
};
use scicat::metadata::MetadataExtractor;
use scicat::model::{
    Attachment, DatasetCommon, OrigDatablock, Ownable, RawDataset,
};

use crate::cli::{Connection, ExtractArgs};

/// Who owns the new dataset and how it is described.
pub struct IngestOptions {
    pub owner_group: String,
    pub access_groups: Vec<String>,
    pub owner: String,
    pub contact_email: String,
    pub principal_investigator: Option<String>,
    pub creation_location: String,
    pub name: Option<String>,
    pub thumbnail: Option<PathBuf>,
    pub dry_run: bool,
}

pub fn run(
    file: PathBuf,
    options: IngestOptions,
    extract: ExtractArgs,
    connection: Connection,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::extract_config(&extract)?;
    let extraction = MetadataExtractor::with_config(config).extract_file(&file)?;
    if !extraction.is_complete() {
        eprintln!(
            "{} {} value(s) replaced by the default",
            "Warning:".yellow().bold(),
            extraction.degraded.len()
        );
    }

    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| format!("Not a file: {}", file.display()))?;
    let source_folder = source_folder(&file);
    let dataset_name = options.name.clone().unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone())
    });

    let ownable = Ownable::new(&options.owner_group).with_access_groups(options.access_groups.clone());
    let size = i64::try_from(get_file_size(&file)?).unwrap_or(i64::MAX);
    let mut common = DatasetCommon::new(
        ownable.clone(),
        dataset_name,
        &options.contact_email,
        source_folder,
    )
    .with_scientific_metadata(extraction.metadata)
    .with_size(size);
    common.number_of_files = Some(1);

    let pi = options
        .principal_investigator
        .clone()
        .unwrap_or_else(|| options.contact_email.clone());
    let dataset = RawDataset::new(common, &options.creation_location, &options.owner, pi);

    if options.dry_run {
        println!("{}", serde_json::to_string_pretty(&dataset)?);
        return Ok(());
    }

    let client = super::connect(&connection)?;
    let pid = client.datasets_raw_replace(&dataset)?;
    println!("{} {}", "Created dataset".green().bold(), pid.white());

    let content = checksummed_datablock(vec![describe_file(&file, &file_name)?]);
    let block = OrigDatablock::new(ownable.clone(), &pid, content);
    client.datasets_origdatablock_create(&block)?;
    info!("origdatablock created for {}", pid);
    println!("  {} {}", "Datablock:".cyan(), file_name);

    if let Some(thumbnail) = &options.thumbnail {
        let image_type = thumbnail
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "png".to_string());
        let attachment = Attachment::for_dataset(ownable, &pid, "thumbnail")
            .with_thumbnail(encode_thumbnail(thumbnail, &image_type)?);
        client.datasets_attachment_create(&attachment, DEFAULT_DATASET_TYPE)?;
        println!("  {} {}", "Thumbnail:".cyan(), thumbnail.display());
    }

    Ok(())
}

fn source_folder(file: &Path) -> String {
    let absolute = std::fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf());
    absolute
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}
