use serde::{Deserialize, Serialize};

use crate::{
  entity::{Channel, coupon_code, discount_offer},
  prelude::*,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOffer {
  pub name: String,
  pub discount_percentage: f64,
  #[serde(with = "utils::timestamp")]
  pub start_date: DateTime,
  #[serde(with = "utils::timestamp")]
  pub end_date: DateTime,
  #[serde(default)]
  pub available_on: Channel,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub discount_percentage: Option<f64>,
  #[serde(
    default,
    with = "utils::timestamp::option",
    skip_serializing_if = "Option::is_none"
  )]
  pub start_date: Option<DateTime>,
  #[serde(
    default,
    with = "utils::timestamp::option",
    skip_serializing_if = "Option::is_none"
  )]
  pub end_date: Option<DateTime>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub available_on: Option<Channel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferFilter {
  /// Offers usable on this channel (`both` offers match every channel)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub available_on: Option<Channel>,
  /// Offers whose window contains this instant
  #[serde(
    default,
    with = "utils::timestamp::option",
    skip_serializing_if = "Option::is_none"
  )]
  pub active_at: Option<DateTime>,
}

/// An offer together with the coupons that reference it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferDetail {
  #[serde(flatten)]
  pub offer: discount_offer::Model,
  pub coupons: Vec<coupon_code::Model>,
}

const NAME_TAKEN: &str = "Discount offer name already exists";

fn check(
  name: &str,
  percentage: f64,
  start: DateTime,
  end: DateTime,
) -> Result<()> {
  if name.is_empty() {
    return Err(Error::validation("Name is required"));
  }
  if !(0.0..=100.0).contains(&percentage) {
    return Err(Error::validation(
      "Discount percentage must be between 0 and 100",
    ));
  }
  if start >= end {
    return Err(Error::validation("Start date must be before end date"));
  }
  Ok(())
}

pub struct Offer<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Offer<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn create(&self, new: NewOffer) -> Result<discount_offer::Model> {
    let name = new.name.trim().to_string();
    check(&name, new.discount_percentage, new.start_date, new.end_date)?;

    let now = utils::now();
    let offer = discount_offer::ActiveModel {
      id: NotSet,
      name: Set(name),
      discount_percentage: Set(new.discount_percentage),
      start_date: Set(new.start_date),
      end_date: Set(new.end_date),
      available_on: Set(new.available_on),
      created_at: Set(now),
      updated_at: Set(now),
    };

    let offer = offer
      .insert(self.db)
      .await
      .map_err(|err| Error::unique(err, NAME_TAKEN))?;
    info!("Created discount offer `{}` ({})", offer.name, offer.id);

    Ok(offer)
  }

  pub async fn update(
    &self,
    id: i32,
    patch: OfferPatch,
  ) -> Result<discount_offer::Model> {
    let txn = self.db.begin().await?;

    let offer = discount_offer::Entity::find_by_id(id)
      .one(&txn)
      .await?
      .ok_or(Error::NotFound("Discount offer"))?;

    let name = match patch.name {
      Some(name) => name.trim().to_string(),
      None => offer.name.clone(),
    };
    let percentage =
      patch.discount_percentage.unwrap_or(offer.discount_percentage);
    let start = patch.start_date.unwrap_or(offer.start_date);
    let end = patch.end_date.unwrap_or(offer.end_date);
    let available_on = patch.available_on.unwrap_or(offer.available_on);

    check(&name, percentage, start, end)?;

    let offer = discount_offer::ActiveModel {
      name: Set(name),
      discount_percentage: Set(percentage),
      start_date: Set(start),
      end_date: Set(end),
      available_on: Set(available_on),
      updated_at: Set(utils::now()),
      ..offer.into()
    }
    .update(&txn)
    .await
    .map_err(|err| Error::unique(err, NAME_TAKEN))?;

    txn.commit().await?;
    Ok(offer)
  }

  pub async fn by_id(&self, id: i32) -> Result<Option<discount_offer::Model>> {
    let offer = discount_offer::Entity::find_by_id(id).one(self.db).await?;
    Ok(offer)
  }

  pub async fn detail(&self, id: i32) -> Result<OfferDetail> {
    let offer = self.by_id(id).await?.ok_or(Error::NotFound("Discount offer"))?;

    let coupons = offer
      .find_related(coupon_code::Entity)
      .order_by_asc(coupon_code::Column::Id)
      .all(self.db)
      .await?;

    Ok(OfferDetail { offer, coupons })
  }

  pub async fn list(
    &self,
    filter: OfferFilter,
  ) -> Result<Vec<discount_offer::Model>> {
    let mut query = discount_offer::Entity::find();

    if let Some(channel) = filter.available_on {
      let mut channels = vec![Channel::Both];
      if channel != Channel::Both {
        channels.push(channel);
      }
      query = query.filter(discount_offer::Column::AvailableOn.is_in(channels));
    }

    if let Some(at) = filter.active_at {
      query = query
        .filter(discount_offer::Column::StartDate.lte(at))
        .filter(discount_offer::Column::EndDate.gte(at));
    }

    let offers = query
      .order_by_desc(discount_offer::Column::StartDate)
      .all(self.db)
      .await?;

    Ok(offers)
  }
}
