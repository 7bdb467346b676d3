//! Typed SciCat records.
//!
//! Field names follow the SciCat API (camelCase on the wire). Required
//! fields are plain values, so deserializing a record that lacks one fails;
//! optional fields are skipped when serializing if unset.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    Raw,
    Derived,
}

/// Audit fields shared by most records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MongoQueryable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Ownership and access fields shared by owned records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ownable {
    pub owner_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_groups: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrument_group: Option<String>,
    #[serde(flatten)]
    pub audit: MongoQueryable,
}

impl Ownable {
    pub fn new(owner_group: impl Into<String>) -> Self {
        Self {
            owner_group: owner_group.into(),
            ..Default::default()
        }
    }

    pub fn with_access_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.access_groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }
}

/// A SciCat user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub realm: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    pub id: String,
}

/// Purpose of an experiment; links it to its principal investigator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    #[serde(flatten)]
    pub ownable: Ownable,
    pub proposal_id: String,
    #[serde(rename = "pi_email", skip_serializing_if = "Option::is_none")]
    pub pi_email: Option<String>,
    #[serde(rename = "pi_firstname", skip_serializing_if = "Option::is_none")]
    pub pi_firstname: Option<String>,
    #[serde(rename = "pi_lastname", skip_serializing_if = "Option::is_none")]
    pub pi_lastname: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(rename = "MeasurementPeriodList", skip_serializing_if = "Option::is_none")]
    pub measurement_period_list: Option<Vec<Value>>,
}

/// Characteristics of a sample under investigation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    #[serde(flatten)]
    pub ownable: Ownable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_characteristics: Option<Value>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasets_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_dataset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_dataset_id: Option<String>,
}

/// A job executed by an external system (archiving, retrieval, analysis).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(flatten)]
    pub audit: MongoQueryable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email_job_initiator: String,
    #[serde(rename = "type")]
    pub job_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_list: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_result_object: Option<Value>,
}

/// An instrument; most of its description lives in `custom_metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    #[serde(flatten)]
    pub audit: MongoQueryable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    pub name: String,
    pub unique_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_metadata: Option<Value>,
}

/// Relationship between two datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub pid: String,
    pub relationship: String,
}

/// Archive/retrieve lifecycle of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetLifecycle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archivable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_retention_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_return_message: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_disk_purging: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_publishing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_on_central_disk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publishable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrievable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieve_return_message: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieve_status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieve_integrity_check: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,
}

/// Fields common to every dataset flavour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetCommon {
    #[serde(flatten)]
    pub ownable: Ownable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub contact_email: String,
    pub creation_time: String,
    pub dataset_name: String,
    #[serde(rename = "datasetlifecycle", skip_serializing_if = "Option::is_none")]
    pub dataset_lifecycle: Option<DatasetLifecycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_quality_metrics: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrument_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investigator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_log_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_parameters: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_files: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_files_archived: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orcid_of_owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packed_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<Relationship>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_number: Option<String>,
    /// Output of the metadata extractor, passed through as-is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scientific_metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_with: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    pub source_folder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_folder_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub techniques: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl DatasetCommon {
    /// Common fields with `creation_time` set to now.
    pub fn new(
        ownable: Ownable,
        dataset_name: impl Into<String>,
        contact_email: impl Into<String>,
        source_folder: impl Into<String>,
    ) -> Self {
        Self {
            ownable,
            contact_email: contact_email.into(),
            creation_time: Utc::now().to_rfc3339(),
            dataset_name: dataset_name.into(),
            source_folder: source_folder.into(),
            ..Default::default()
        }
    }

    pub fn with_creation_time(mut self, time: impl Into<String>) -> Self {
        self.creation_time = time.into();
        self
    }

    pub fn with_scientific_metadata(mut self, metadata: Value) -> Self {
        self.scientific_metadata = Some(metadata);
        self
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }
}

/// Generic dataset posted to the `Datasets` endpoint; the backend tells raw
/// and derived apart by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(flatten)]
    pub common: DatasetCommon,
    #[serde(rename = "type")]
    pub dataset_type: DatasetType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_datasets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_investigators: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scientific_metadata_schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_software: Option<Vec<String>>,
}

impl Dataset {
    pub fn new(common: DatasetCommon, dataset_type: DatasetType) -> Self {
        Self {
            common,
            dataset_type,
            creation_location: None,
            data_format: None,
            end_time: None,
            input_datasets: None,
            owner: None,
            principal_investigators: None,
            proposal_ids: None,
            sample_ids: None,
            scientific_metadata_schema: None,
            used_software: None,
        }
    }
}

/// Dataset produced directly by an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDataset {
    #[serde(flatten)]
    pub common: DatasetCommon,
    pub creation_location: String,
    pub owner: String,
    pub principal_investigator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_datasets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,
    #[serde(rename = "type", default = "raw_type")]
    dataset_type: DatasetType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_software: Option<Vec<String>>,
}

fn raw_type() -> DatasetType {
    DatasetType::Raw
}

impl RawDataset {
    pub fn new(
        common: DatasetCommon,
        creation_location: impl Into<String>,
        owner: impl Into<String>,
        principal_investigator: impl Into<String>,
    ) -> Self {
        Self {
            common,
            creation_location: creation_location.into(),
            owner: owner.into(),
            principal_investigator: principal_investigator.into(),
            data_format: None,
            end_time: None,
            input_datasets: None,
            proposal_id: None,
            sample_id: None,
            dataset_type: DatasetType::Raw,
            used_software: None,
        }
    }

    pub fn dataset_type(&self) -> DatasetType {
        self.dataset_type
    }
}

/// Dataset derived from one or more input datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedDataset {
    #[serde(flatten)]
    pub common: DatasetCommon,
    #[serde(default)]
    pub input_datasets: Vec<String>,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<String>,
    #[serde(rename = "type", default = "derived_type")]
    dataset_type: DatasetType,
    #[serde(default)]
    pub used_software: Vec<String>,
}

fn derived_type() -> DatasetType {
    DatasetType::Derived
}

impl DerivedDataset {
    pub fn new(common: DatasetCommon, owner: impl Into<String>) -> Self {
        Self {
            common,
            input_datasets: Vec::new(),
            owner: owner.into(),
            proposal_id: None,
            dataset_type: DatasetType::Derived,
            used_software: Vec::new(),
        }
    }

    pub fn dataset_type(&self) -> DatasetType {
        self.dataset_type
    }
}

/// A raw or derived dataset, for endpoints that accept either.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetKind {
    Raw(RawDataset),
    Derived(DerivedDataset),
}

impl DatasetKind {
    pub fn dataset_type(&self) -> DatasetType {
        match self {
            DatasetKind::Raw(_) => DatasetType::Raw,
            DatasetKind::Derived(_) => DatasetType::Derived,
        }
    }
}

impl From<RawDataset> for DatasetKind {
    fn from(d: RawDataset) -> Self {
        DatasetKind::Raw(d)
    }
}

impl From<DerivedDataset> for DatasetKind {
    fn from(d: DerivedDataset) -> Self {
        DatasetKind::Derived(d)
    }
}

/// Partial dataset sent to the update endpoint; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_groups: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_datasets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_investigator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scientific_metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_folder: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub dataset_type: Option<DatasetType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_software: Option<Vec<String>>,
}

/// A file reference; `path` is relative to the dataset's source folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFile {
    #[serde(flatten)]
    pub audit: MongoQueryable,
    pub path: String,
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm: Option<String>,
}

impl DataFile {
    pub fn new(path: impl Into<String>, size: i64) -> Self {
        Self {
            path: path.into(),
            size,
            ..Default::default()
        }
    }
}

/// Files belonging to a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datablock {
    #[serde(flatten)]
    pub ownable: Ownable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packed_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chk_alg: Option<String>,
    pub version: String,
    pub data_file_list: Vec<DataFile>,
    pub dataset_id: String,
}

/// Body for creating an original datablock alongside a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatasetOrigDatablock {
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chk_alg: Option<String>,
    pub data_file_list: Vec<DataFile>,
}

impl CreateDatasetOrigDatablock {
    /// Datablock whose size is the sum of its files.
    pub fn from_files(files: Vec<DataFile>) -> Self {
        Self {
            size: files.iter().map(|f| f.size).sum(),
            chk_alg: None,
            data_file_list: files,
        }
    }
}

/// Original datablock: the files as they were ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrigDatablock {
    #[serde(flatten)]
    pub ownable: Ownable,
    #[serde(flatten)]
    pub content: CreateDatasetOrigDatablock,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub dataset_id: String,
}

impl OrigDatablock {
    pub fn new(
        ownable: Ownable,
        dataset_id: impl Into<String>,
        content: CreateDatasetOrigDatablock,
    ) -> Self {
        Self {
            ownable,
            content,
            id: None,
            dataset_id: dataset_id.into(),
        }
    }
}

/// A base64 payload (thumbnails) attached to a dataset, proposal or sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(flatten)]
    pub ownable: Ownable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub caption: String,
}

impl Attachment {
    pub fn for_dataset(
        ownable: Ownable,
        dataset_id: impl Into<String>,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            ownable,
            id: None,
            dataset_id: Some(dataset_id.into()),
            proposal_id: None,
            sample_id: None,
            thumbnail: None,
            caption: caption.into(),
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }
}

/// Published data with a registered DOI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedData {
    pub doi: String,
    pub affiliation: String,
    pub creator: Vec<String>,
    pub publisher: String,
    pub publication_year: i32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub data_description: String,
    pub resource_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_files: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_of_archive: Option<i64>,
    pub pid_array: Vec<String>,
    pub authors: Vec<String>,
    pub registered_time: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn common() -> DatasetCommon {
        DatasetCommon::new(
            Ownable::new("magrathea").with_access_groups(["deep_thought"]),
            "planet survey",
            "slartibartfast@magrathea.org",
            "/foo/bar",
        )
        .with_creation_time("2024-01-01T00:00:00Z")
    }

    #[test]
    fn test_raw_dataset_wire_format() {
        let mut raw = RawDataset::new(common(), "magrathea", "slartibartfast", "A. Mouse");
        raw.common.scientific_metadata = Some(json!({"a": "field"}));
        let value = serde_json::to_value(&raw).unwrap();

        assert_eq!(value["type"], json!("raw"));
        assert_eq!(value["ownerGroup"], json!("magrathea"));
        assert_eq!(value["accessGroups"], json!(["deep_thought"]));
        assert_eq!(value["principalInvestigator"], json!("A. Mouse"));
        assert_eq!(value["scientificMetadata"], json!({"a": "field"}));
        assert_eq!(value["creationTime"], json!("2024-01-01T00:00:00Z"));
        // unset optionals are omitted
        assert!(value.get("pid").is_none());
        assert!(value.get("proposalId").is_none());
        assert!(value.get("createdBy").is_none());
    }

    #[test]
    fn test_derived_dataset_defaults() {
        let derived = DerivedDataset::new(common(), "owner");
        let value = serde_json::to_value(&derived).unwrap();
        assert_eq!(value["type"], json!("derived"));
        assert_eq!(value["inputDatasets"], json!([]));
        assert_eq!(value["usedSoftware"], json!([]));
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let incomplete = json!({
            "ownerGroup": "g",
            "contactEmail": "a@b.c",
            "creationTime": "2024-01-01",
            "datasetName": "n",
            "sourceFolder": "/x",
            "creationLocation": "here",
            "owner": "me"
        });
        assert!(serde_json::from_value::<RawDataset>(incomplete).is_err());
    }

    #[test]
    fn test_raw_dataset_roundtrip_keeps_type() {
        let raw = RawDataset::new(common(), "loc", "owner", "pi");
        let value = serde_json::to_value(&raw).unwrap();
        let back: RawDataset = serde_json::from_value(value).unwrap();
        assert_eq!(back.dataset_type(), DatasetType::Raw);
        assert_eq!(back, raw);
    }

    #[test]
    fn test_orig_datablock_flattens_content() {
        let block = OrigDatablock::new(
            Ownable::new("g"),
            "pid/1",
            CreateDatasetOrigDatablock::from_files(vec![
                DataFile::new("file.h5", 42),
                DataFile::new("other.h5", 8),
            ]),
        );
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["size"], json!(50));
        assert_eq!(value["datasetId"], json!("pid/1"));
        assert_eq!(value["dataFileList"][0]["path"], json!("file.h5"));
    }

    #[test]
    fn test_dataset_update_only_sends_set_fields() {
        let update = DatasetUpdate {
            description: Some("re-reduced".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"description": "re-reduced"})
        );
    }

    #[test]
    fn test_proposal_field_names() {
        let proposal: Proposal = serde_json::from_value(json!({
            "ownerGroup": "g",
            "proposalId": "p1",
            "email": "pi@x.org",
            "pi_email": "pi@x.org",
            "abstract": "text",
            "MeasurementPeriodList": []
        }))
        .unwrap();
        assert_eq!(proposal.pi_email.as_deref(), Some("pi@x.org"));
        assert_eq!(proposal.abstract_text.as_deref(), Some("text"));
    }
}
