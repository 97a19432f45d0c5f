use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  entity::{
    Channel, CouponStatus,
    coupon_code::{self, normalize},
    discount_offer,
  },
  prelude::*,
};

pub const MAX_GENERATED: u32 = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCoupon {
  pub code: String,
  #[serde(with = "utils::timestamp")]
  pub expiration_date: DateTime,
  pub discount_offer_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCoupons {
  pub discount_offer_id: i32,
  pub count: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prefix: Option<String>,
  #[serde(with = "utils::timestamp")]
  pub expiration_date: DateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponFilter {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<CouponStatus>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub discount_offer_id: Option<i32>,
}

/// What a valid coupon is worth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponQuote {
  pub code: String,
  pub offer_name: String,
  pub discount_percentage: f64,
  pub available_on: Channel,
  pub expiration_date: DateTime,
}

const CODE_TAKEN: &str = "Coupon code already exists";

fn required_code(raw: &str) -> Result<String> {
  let code = normalize(raw);
  if code.is_empty() {
    return Err(Error::validation("Coupon code is required"));
  }
  Ok(code)
}

/// Fails with the reason an existing coupon can't be used right now.
fn ensure_usable(coupon: &coupon_code::Model, now: DateTime) -> Result<()> {
  if coupon.is_usable_at(now) {
    return Ok(());
  }
  if coupon.is_expired_at(now) {
    return Err(CouponError::Expired.into());
  }
  if coupon.status == CouponStatus::Used {
    return Err(CouponError::AlreadyUsed.into());
  }
  Ok(())
}

fn random_code(prefix: Option<&str>) -> String {
  let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
  match prefix {
    Some(prefix) => format!("{prefix}-{suffix}"),
    None => suffix,
  }
}

pub struct Coupon<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Coupon<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  async fn require_offer<C: ConnectionTrait>(
    db: &C,
    id: i32,
  ) -> Result<discount_offer::Model> {
    discount_offer::Entity::find_by_id(id)
      .one(db)
      .await?
      .ok_or(Error::NotFound("Discount offer"))
  }

  fn active_model(
    code: String,
    expiration_date: DateTime,
    discount_offer_id: i32,
  ) -> coupon_code::ActiveModel {
    coupon_code::ActiveModel {
      id: NotSet,
      code: Set(code),
      expiration_date: Set(expiration_date),
      status: Set(CouponStatus::Unused),
      contact: Set(None),
      discount_offer_id: Set(discount_offer_id),
      used_at: Set(None),
      created_at: Set(utils::now()),
    }
  }

  pub async fn create(&self, new: NewCoupon) -> Result<coupon_code::Model> {
    let code = required_code(&new.code)?;
    Self::require_offer(self.db, new.discount_offer_id).await?;

    let coupon =
      Self::active_model(code, new.expiration_date, new.discount_offer_id)
        .insert(self.db)
        .await
        .map_err(|err| Error::unique(err, CODE_TAKEN))?;

    info!(
      "Created coupon `{}` for offer {}",
      coupon.code, coupon.discount_offer_id
    );
    Ok(coupon)
  }

  /// Creates `count` random codes for one offer, all or nothing.
  pub async fn generate(
    &self,
    req: GenerateCoupons,
  ) -> Result<Vec<coupon_code::Model>> {
    if req.count == 0 || req.count > MAX_GENERATED {
      return Err(Error::validation(format!(
        "Count must be between 1 and {MAX_GENERATED}"
      )));
    }

    let prefix = req.prefix.as_deref().map(normalize).filter(|p| !p.is_empty());
    if let Some(prefix) = &prefix
      && !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
      return Err(Error::validation(
        "Prefix may only contain letters, digits and dashes",
      ));
    }

    let txn = self.db.begin().await?;
    Self::require_offer(&txn, req.discount_offer_id).await?;

    let mut coupons = Vec::with_capacity(req.count as usize);
    for _ in 0..req.count {
      let coupon = Self::active_model(
        random_code(prefix.as_deref()),
        req.expiration_date,
        req.discount_offer_id,
      )
      .insert(&txn)
      .await
      .map_err(|err| Error::unique(err, CODE_TAKEN))?;
      coupons.push(coupon);
    }

    txn.commit().await?;
    info!(
      "Generated {} coupons for offer {}",
      coupons.len(),
      req.discount_offer_id
    );

    Ok(coupons)
  }

  pub async fn by_code(
    &self,
    code: &str,
  ) -> Result<Option<coupon_code::Model>> {
    let coupon = coupon_code::Entity::find()
      .filter(coupon_code::Column::Code.eq(normalize(code)))
      .one(self.db)
      .await?;
    Ok(coupon)
  }

  pub async fn list(
    &self,
    filter: CouponFilter,
  ) -> Result<Vec<coupon_code::Model>> {
    let mut query = coupon_code::Entity::find();

    if let Some(status) = filter.status {
      query = query.filter(coupon_code::Column::Status.eq(status));
    }
    if let Some(offer) = filter.discount_offer_id {
      query = query.filter(coupon_code::Column::DiscountOfferId.eq(offer));
    }

    Ok(query.order_by_asc(coupon_code::Column::Id).all(self.db).await?)
  }

  /// Checks a code without consuming it.
  pub async fn validate(&self, code: &str) -> Result<CouponQuote> {
    let code = required_code(code)?;

    let (coupon, offer) = coupon_code::Entity::find()
      .filter(coupon_code::Column::Code.eq(&code))
      .find_also_related(discount_offer::Entity)
      .one(self.db)
      .await?
      .ok_or(Error::NotFound("Coupon"))?;
    let offer = offer.ok_or(Error::NotFound("Discount offer"))?;

    ensure_usable(&coupon, utils::now())?;

    Ok(CouponQuote {
      code: coupon.code,
      offer_name: offer.name,
      discount_percentage: offer.discount_percentage,
      available_on: offer.available_on,
      expiration_date: coupon.expiration_date,
    })
  }

  /// Consumes a code. The status flip is one conditional UPDATE, so of two
  /// concurrent redemptions exactly one sees an affected row.
  pub async fn redeem(
    &self,
    code: &str,
    contact: Option<String>,
  ) -> Result<coupon_code::Model> {
    let code = required_code(code)?;
    let contact =
      contact.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
    let now = utils::now();

    let res = coupon_code::Entity::update_many()
      .col_expr(coupon_code::Column::Status, Expr::value(CouponStatus::Used))
      .col_expr(coupon_code::Column::UsedAt, Expr::value(now))
      .col_expr(coupon_code::Column::Contact, Expr::value(contact))
      .filter(coupon_code::Column::Code.eq(&code))
      .filter(coupon_code::Column::Status.eq(CouponStatus::Unused))
      .filter(coupon_code::Column::ExpirationDate.gte(now))
      .exec(self.db)
      .await?;

    let coupon = coupon_code::Entity::find()
      .filter(coupon_code::Column::Code.eq(&code))
      .one(self.db)
      .await?
      .ok_or(Error::NotFound("Coupon"))?;

    if res.rows_affected == 0 {
      ensure_usable(&coupon, now)?;
      // lost the race between our update and this read
      return Err(CouponError::AlreadyUsed.into());
    }

    info!("Coupon `{}` redeemed", coupon.code);
    Ok(coupon)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    state::{connect, tests::setup_test_db},
    sv::{
      Offer,
      offer::tests::{day, summer},
    },
  };

  async fn setup() -> (DatabaseConnection, i32) {
    let db = setup_test_db().await;
    let offer = Offer::new(&db).create(summer()).await.unwrap();
    (db, offer.id)
  }

  fn in_days(days: i64) -> DateTime {
    utils::now() + TimeDelta::days(days)
  }

  fn new_coupon(
    code: &str,
    expiration_date: DateTime,
    offer: i32,
  ) -> NewCoupon {
    NewCoupon { code: code.into(), expiration_date, discount_offer_id: offer }
  }

  #[tokio::test]
  async fn test_code_is_normalized() {
    let (db, offer) = setup().await;
    let sv = Coupon::new(&db);

    let coupon =
      sv.create(new_coupon("  save10  ", in_days(30), offer)).await.unwrap();
    assert_eq!(coupon.code, "SAVE10");
    assert_eq!(coupon.status, CouponStatus::Unused);

    let a = sv.by_code("  save10  ").await.unwrap().unwrap();
    let b = sv.by_code("SAVE10").await.unwrap().unwrap();
    assert_eq!(a.id, b.id);
  }

  #[tokio::test]
  async fn test_duplicate_code_conflicts() {
    let (db, offer) = setup().await;
    let sv = Coupon::new(&db);

    sv.create(new_coupon("SAVE10", in_days(30), offer)).await.unwrap();
    let err =
      sv.create(new_coupon("save10 ", in_days(30), offer)).await.unwrap_err();

    assert!(matches!(err, Error::Conflict(_)));
  }

  #[tokio::test]
  async fn test_create_requires_offer_and_code() {
    let (db, offer) = setup().await;
    let sv = Coupon::new(&db);

    let err = sv.create(new_coupon("SAVE10", in_days(1), 999)).await;
    assert!(matches!(err, Err(Error::NotFound("Discount offer"))));

    let err = sv.create(new_coupon("   ", in_days(1), offer)).await;
    assert!(matches!(err, Err(Error::Validation(_))));
  }

  #[tokio::test]
  async fn test_validate_expired() {
    let (db, offer) = setup().await;
    let sv = Coupon::new(&db);

    sv.create(new_coupon("save10", day(2020, 1, 1), offer)).await.unwrap();

    let err = sv.validate("SAVE10").await.unwrap_err();
    assert!(matches!(err, Error::Coupon(CouponError::Expired)));
  }

  #[tokio::test]
  async fn test_validate_does_not_consume() {
    let (db, offer) = setup().await;
    let sv = Coupon::new(&db);

    sv.create(new_coupon("SAVE10", in_days(30), offer)).await.unwrap();

    let quote = sv.validate(" save10").await.unwrap();
    assert_eq!(quote.code, "SAVE10");
    assert_eq!(quote.offer_name, "SUMMER");
    assert_eq!(quote.discount_percentage, 20.0);
    assert_eq!(quote.available_on, Channel::Website);

    let again = sv.validate("SAVE10").await.unwrap();
    assert_eq!(again, quote);

    let stored = sv.by_code("SAVE10").await.unwrap().unwrap();
    assert_eq!(stored.status, CouponStatus::Unused);
  }

  #[tokio::test]
  async fn test_validate_unknown() {
    let (db, _) = setup().await;

    let err = Coupon::new(&db).validate("NOPE").await.unwrap_err();
    assert!(matches!(err, Error::NotFound("Coupon")));
  }

  #[tokio::test]
  async fn test_redeem_once() {
    let (db, offer) = setup().await;
    let sv = Coupon::new(&db);

    sv.create(new_coupon("SAVE10", in_days(30), offer)).await.unwrap();

    let used = sv.redeem("save10", Some(" contact-7 ".into())).await.unwrap();
    assert_eq!(used.status, CouponStatus::Used);
    assert_eq!(used.contact.as_deref(), Some("contact-7"));
    assert!(used.used_at.is_some());

    let err = sv.redeem("SAVE10", None).await.unwrap_err();
    assert!(matches!(err, Error::Coupon(CouponError::AlreadyUsed)));

    let err = sv.validate("SAVE10").await.unwrap_err();
    assert!(matches!(err, Error::Coupon(CouponError::AlreadyUsed)));
  }

  #[tokio::test]
  async fn test_redeem_expired_or_missing() {
    let (db, offer) = setup().await;
    let sv = Coupon::new(&db);

    sv.create(new_coupon("OLD", day(2020, 1, 1), offer)).await.unwrap();

    let err = sv.redeem("old", None).await.unwrap_err();
    assert!(matches!(err, Error::Coupon(CouponError::Expired)));

    let stored = sv.by_code("OLD").await.unwrap().unwrap();
    assert_eq!(stored.status, CouponStatus::Unused);

    let err = sv.redeem("MISSING", None).await.unwrap_err();
    assert!(matches!(err, Error::NotFound("Coupon")));
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn test_concurrent_redeem_single_winner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    let db = connect(&format!("sqlite:{}?mode=rwc", path.display()))
      .await
      .unwrap();

    let offer = Offer::new(&db).create(summer()).await.unwrap();
    Coupon::new(&db)
      .create(new_coupon("SAVE10", in_days(30), offer.id))
      .await
      .unwrap();

    let tasks = (0..16).map(|_| {
      let db = db.clone();
      tokio::spawn(async move { Coupon::new(&db).redeem("save10", None).await })
    });
    let results: Vec<_> = futures::future::join_all(tasks)
      .await
      .into_iter()
      .map(|joined| joined.unwrap())
      .collect();

    let wins = results.iter().filter(|r| r.is_ok()).count();
    let used = results
      .iter()
      .filter(|r| matches!(r, Err(Error::Coupon(CouponError::AlreadyUsed))))
      .count();

    assert_eq!(wins, 1);
    assert_eq!(used, 15);
  }

  #[tokio::test]
  async fn test_generate_and_list() {
    let (db, offer) = setup().await;
    let sv = Coupon::new(&db);

    let coupons = sv
      .generate(GenerateCoupons {
        discount_offer_id: offer,
        count: 5,
        prefix: Some("summer".into()),
        expiration_date: in_days(10),
      })
      .await
      .unwrap();

    assert_eq!(coupons.len(), 5);
    assert!(coupons.iter().all(|c| c.code.starts_with("SUMMER-")));
    assert!(coupons.iter().all(|c| c.code.len() == "SUMMER-".len() + 8));

    sv.redeem(&coupons[0].code, None).await.unwrap();

    let unused = sv
      .list(CouponFilter {
        status: Some(CouponStatus::Unused),
        discount_offer_id: Some(offer),
      })
      .await
      .unwrap();
    assert_eq!(unused.len(), 4);

    let detail = Offer::new(&db).detail(offer).await.unwrap();
    assert_eq!(detail.coupons.len(), 5);
  }

  #[tokio::test]
  async fn test_generate_bounds() {
    let (db, offer) = setup().await;
    let sv = Coupon::new(&db);

    let req = |count, prefix: Option<&str>| GenerateCoupons {
      discount_offer_id: offer,
      count,
      prefix: prefix.map(Into::into),
      expiration_date: in_days(10),
    };

    assert!(matches!(
      sv.generate(req(0, None)).await,
      Err(Error::Validation(_))
    ));
    assert!(matches!(
      sv.generate(req(MAX_GENERATED + 1, None)).await,
      Err(Error::Validation(_))
    ));
    assert!(matches!(
      sv.generate(req(1, Some("50% OFF"))).await,
      Err(Error::Validation(_))
    ));
    assert!(sv.list(CouponFilter::default()).await.unwrap().is_empty());
  }
}
