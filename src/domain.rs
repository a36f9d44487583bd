pub mod collation;
pub mod customer;
pub mod query;

use derive_more::{Display, Error};

/// データソースエラー
#[derive(Error, Display, Debug)]
pub enum DataAccessError {
    /// データソースを読み込めない
    #[display(fmt = "Data read error: {}", _0)]
    ReadError(std::io::Error),
    /// データソースの形式が不正
    #[display(fmt = "Data parse error: {}", _0)]
    ParseError(serde_json::Error),
}
