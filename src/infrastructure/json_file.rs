use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::trace;

use crate::domain::{
    customer::{Customer, CustomerRepository},
    DataAccessError,
};

/// JSONファイルをデータソースとする顧客リポジトリ
///
/// 呼び出しごとにファイル全体を読み込み、パースする。
#[derive(Clone, Debug)]
pub struct JsonFileCustomerRepository {
    path: PathBuf,
}

impl JsonFileCustomerRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CustomerRepository for JsonFileCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, DataAccessError> {
        trace!("顧客データ読み込み: {}", self.path.display());
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(DataAccessError::ReadError)?;
        serde_json::from_str(&data).map_err(DataAccessError::ParseError)
    }
}
