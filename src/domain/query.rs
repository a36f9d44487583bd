use derive_more::{Display, Error};
use tracing::{debug, error};

use crate::domain::{
    collation,
    customer::{Customer, CustomerRepository, Purchase},
    DataAccessError,
};

/// 顧客照会サービス
///
/// 照会のたびにリポジトリから全顧客を読み込み直す。読み込み結果は保持しない。
pub struct CustomerQueryService<R> {
    repository: R,
}

impl<R: CustomerRepository> CustomerQueryService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// 全顧客を姓の照合順で返す
    pub async fn list_customers(&self) -> Result<Vec<Customer>, QueryError> {
        let mut customers = self.load().await?;
        customers.sort_by(|a, b| collation::compare(a.surname(), b.surname()));
        Ok(customers)
    }

    /// 指定店舗の顧客を返す
    pub async fn find_by_store(&self, store: &str) -> Result<Vec<Customer>, QueryError> {
        let customers = self
            .load()
            .await?
            .into_iter()
            .filter(|c| c.shops_at(store))
            .collect::<Vec<_>>();
        non_empty(customers, NotFound::Store)
    }

    /// 姓名が完全一致する顧客を返す
    pub async fn find_by_name(
        &self,
        surname: &str,
        first_name: &str,
    ) -> Result<Vec<Customer>, QueryError> {
        let customers = self
            .load()
            .await?
            .into_iter()
            .filter(|c| c.is_named(surname, first_name))
            .collect::<Vec<_>>();
        non_empty(customers, NotFound::Customer)
    }

    /// 姓が一致し、名が前方一致する顧客を返す
    ///
    /// 前方一致の文字列がない場合はデータソースを読まずにエラーとする。
    /// 該当なしはエラーではなく空のリストを返す。
    pub async fn find_by_name_prefix(
        &self,
        surname: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<Customer>, QueryError> {
        let prefix = match prefix {
            Some(prefix) if !prefix.is_empty() => prefix,
            _ => return Err(QueryError::MissingParameter("nombre")),
        };
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|c| c.is_named_like(surname, prefix))
            .collect())
    }

    /// 全顧客の購入品から指定ブランドのものを顧客順に平坦化して返す
    pub async fn find_purchases_by_brand(&self, brand: &str) -> Result<Vec<Purchase>, QueryError> {
        let purchases = self
            .load()
            .await?
            .into_iter()
            .flat_map(Customer::into_purchases)
            .filter(|p| p.is_brand(brand))
            .collect::<Vec<_>>();
        non_empty(purchases, NotFound::Brand)
    }

    async fn load(&self) -> Result<Vec<Customer>, QueryError> {
        self.repository.find_all().await.map_err(|e| {
            error!("顧客データ読み込みエラー: {}", e);
            QueryError::from(e)
        })
    }
}

fn non_empty<T>(items: Vec<T>, not_found: NotFound) -> Result<Vec<T>, QueryError> {
    if items.is_empty() {
        debug!("該当なし: {}", not_found);
        Err(QueryError::NotFound(not_found))
    } else {
        Ok(items)
    }
}

/// 該当なしとなった照会
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum NotFound {
    #[display(fmt = "no customers in store")]
    Store,
    #[display(fmt = "no customer with that name")]
    Customer,
    #[display(fmt = "no purchases of brand")]
    Brand,
}

/// 照会エラー
#[derive(Error, Display, Debug)]
pub enum QueryError {
    #[display(fmt = "{}", _0)]
    DataAccess(DataAccessError),
    #[display(fmt = "Missing parameter: {}", _0)]
    MissingParameter(#[error(not(source))] &'static str),
    #[display(fmt = "Not found: {}", _0)]
    NotFound(#[error(not(source))] NotFound),
}

impl From<DataAccessError> for QueryError {
    fn from(value: DataAccessError) -> Self {
        Self::DataAccess(value)
    }
}
