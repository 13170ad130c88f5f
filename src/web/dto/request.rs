//! Request DTOs for Web API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::validation::folder_name;

/// Body of `POST /api/folders`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    /// Folder name.
    #[serde(default)]
    #[validate(
        custom(function = "folder_name"),
        length(max = 255, message = "Folder name is too long")
    )]
    pub name: String,
    /// Parent folder ID; omitted or null for a root folder.
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// Body of `PUT /api/folders/:id`.
///
/// Omitting `parentId` moves the folder to the root.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderRequest {
    /// New folder name.
    #[serde(default)]
    #[validate(
        custom(function = "folder_name"),
        length(max = 255, message = "Folder name is too long")
    )]
    pub name: String,
    /// New parent folder ID.
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// Multipart body of `POST /api/files/upload`, as documented in OpenAPI.
///
/// The handler reads the parts directly from the multipart stream.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadForm {
    /// File content.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Target folder; omitted, empty or `null` for unfiled.
    pub folder_id: Option<i64>,
}

/// Query of `GET /api/files`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FileListQuery {
    /// Only list files in this folder.
    pub folder_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_folder_request_camel_case() {
        let req: CreateFolderRequest =
            serde_json::from_str(r#"{"name":"2024","parentId":7}"#).unwrap();
        assert_eq!(req.name, "2024");
        assert_eq!(req.parent_id, Some(7));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_folder_request_defaults() {
        let req: CreateFolderRequest = serde_json::from_str(r#"{"name":"Docs"}"#).unwrap();
        assert!(req.parent_id.is_none());

        let req: CreateFolderRequest =
            serde_json::from_str(r#"{"name":"Docs","parentId":null}"#).unwrap();
        assert!(req.parent_id.is_none());
    }

    #[test]
    fn test_create_folder_request_missing_name_fails_validation() {
        let req: CreateFolderRequest = serde_json::from_str(r#"{}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_update_folder_request_validation() {
        let req: UpdateFolderRequest = serde_json::from_str(r#"{"name":"   "}"#).unwrap();
        assert!(req.validate().is_err());

        let long = "x".repeat(256);
        let req = UpdateFolderRequest {
            name: long,
            parent_id: None,
        };
        assert!(req.validate().is_err());

        let req = UpdateFolderRequest {
            name: "ok".to_string(),
            parent_id: Some(1),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_file_list_query() {
        let query: FileListQuery = serde_json::from_str(r#"{"folderId":3}"#).unwrap();
        assert_eq!(query.folder_id, Some(3));

        let query: FileListQuery = serde_json::from_str(r#"{}"#).unwrap();
        assert!(query.folder_id.is_none());
    }
}
