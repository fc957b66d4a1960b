use crate::codec::{self, CSV_MIME, XLSX_MIME};
use crate::error::{ErrorKind, ReconError};
use crate::models::{ReconStats, TableKind};
use crate::service::Reconciler;
use axum::{
    extract::{Json, Multipart, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 表单字段名
pub const CENTRAL_FIELD: &str = "central_file";
pub const LOOKUP_FIELD: &str = "pmd_lookup_file";

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>PMD Lookup</title></head>
<body>
  <h1>PMD Lookup</h1>
  <form action="/process" method="post" enctype="multipart/form-data">
    <p><label>Central file <input type="file" name="central_file" accept=".xls,.xlsx"></label></p>
    <p><label>PMD lookup file <input type="file" name="pmd_lookup_file" accept=".xls,.xlsx"></label></p>
    <p><button type="submit">Process</button></p>
  </form>
</body>
</html>
"#;

/// 输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProcessParams {
    #[serde(default)]
    pub format: OutputFormat,
}

/// 失败响应体
#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

/// 上传的单个文件
#[derive(Debug)]
struct UploadedFile {
    filename: String,
    bytes: Vec<u8>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 上传页面
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// 上传两个工作簿并返回核对结果文件
pub async fn process_files(
    State(reconciler): State<Arc<Reconciler>>,
    Query(params): Query<ProcessParams>,
    multipart: Multipart,
) -> Response {
    let (central, lookup) = match collect_upload(multipart).await {
        Ok(files) => files,
        Err(response) => return response,
    };

    let format = params.format;
    let worker = Arc::clone(&reconciler);
    let task = tokio::task::spawn_blocking(move || {
        process_workbooks(&worker, &central.bytes, &lookup.bytes, format)
    });

    let result = match task.await {
        Ok(result) => result,
        Err(e) => Err(ReconError::Unexpected(format!("processing task failed: {}", e))),
    };

    match result {
        Ok((bytes, stats)) => {
            tracing::info!(
                "File processed successfully: {} rows (new {}, hold {})",
                stats.output_rows(),
                stats.new,
                stats.hold
            );
            attachment(bytes, format, &reconciler.config().download_name)
        }
        Err(e) => error_response(e),
    }
}

/// 读取两个工作簿、执行核对并编码结果
pub fn process_workbooks(
    reconciler: &Reconciler,
    central: &[u8],
    lookup: &[u8],
    format: OutputFormat,
) -> Result<(Vec<u8>, ReconStats), ReconError> {
    let reference = codec::read_table(central, TableKind::Reference)?;
    let candidate = codec::read_table(lookup, TableKind::Candidate)?;
    let output = reconciler.run(reference, candidate)?;
    let bytes = match format {
        OutputFormat::Xlsx => codec::write_table(&output.table, &reconciler.config().sheet_name)?,
        OutputFormat::Csv => codec::write_csv(&output.table)?,
    };
    Ok((bytes, output.stats))
}

/// 收集并校验上传的两个文件；校验失败直接返回 400 响应
async fn collect_upload(mut multipart: Multipart) -> Result<(UploadedFile, UploadedFile), Response> {
    let mut central: Option<UploadedFile> = None;
    let mut lookup: Option<UploadedFile> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(bad_request(format!("Invalid upload: {}", e))),
        };
        let name = field.name().unwrap_or_default().to_string();
        if name != CENTRAL_FIELD && name != LOOKUP_FIELD {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => return Err(bad_request(format!("Invalid upload: {}", e))),
        };
        let file = UploadedFile { filename, bytes };
        if name == CENTRAL_FIELD {
            central = Some(file);
        } else {
            lookup = Some(file);
        }
    }

    let (Some(central), Some(lookup)) = (central, lookup) else {
        return Err(bad_request("Both files are required."));
    };
    if central.filename.is_empty() || lookup.filename.is_empty() {
        return Err(bad_request("Please select both files."));
    }
    if !(codec::allowed_file(&central.filename) && codec::allowed_file(&lookup.filename)) {
        return Err(bad_request("Only Excel files (.xls, .xlsx) are allowed."));
    }

    tracing::info!(
        "Received central '{}' ({} bytes), lookup '{}' ({} bytes)",
        central.filename,
        central.bytes.len(),
        lookup.filename,
        lookup.bytes.len()
    );
    Ok((central, lookup))
}

fn attachment(bytes: Vec<u8>, format: OutputFormat, download_name: &str) -> Response {
    let (mime, filename) = match format {
        OutputFormat::Xlsx => (XLSX_MIME, download_name.to_string()),
        OutputFormat::Csv => {
            let stem = download_name.rsplit_once('.').map_or(download_name, |(stem, _)| stem);
            (CSV_MIME, format!("{}.csv", stem))
        }
    };
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(mime)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

fn bad_request(message: impl Into<String>) -> Response {
    let response = ProcessResponse {
        success: false,
        message: message.into(),
        kind: None,
    };
    (StatusCode::BAD_REQUEST, Json(response)).into_response()
}

fn error_response(e: ReconError) -> Response {
    tracing::error!("Processing failed: {}", e);
    let kind = e.kind();
    let (status, message) = match kind {
        ErrorKind::MissingColumn | ErrorKind::EmptyOrUnreadableInput => {
            (StatusCode::UNPROCESSABLE_ENTITY, format!("Error: {}", e))
        }
        ErrorKind::UnexpectedFailure => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error: unexpected failure while processing files".to_string(),
        ),
    };
    let response = ProcessResponse {
        success: false,
        message,
        kind: Some(kind),
    };
    (status, Json(response)).into_response()
}
