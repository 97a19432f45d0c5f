use sea_orm::sea_query::OnConflict;
use serde::{Deserialize, Serialize};

use crate::{
  entity::settings::{self, SINGLETON_ID},
  prelude::*,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub automatic_invoicing: Option<bool>,
}

pub struct Settings<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Settings<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Returns the singleton, inserting the defaults on first access.
  pub async fn get(&self) -> Result<settings::Model> {
    if let Some(settings) =
      settings::Entity::find_by_id(SINGLETON_ID).one(self.db).await?
    {
      return Ok(settings);
    }

    let defaults = settings::ActiveModel {
      id: Set(SINGLETON_ID),
      automatic_invoicing: Set(true),
      updated_at: Set(utils::now()),
    };

    // a concurrent first access may have inserted it already
    let inserted = settings::Entity::insert(defaults)
      .on_conflict(
        OnConflict::column(settings::Column::Id).do_nothing().to_owned(),
      )
      .exec_without_returning(self.db)
      .await?;
    if inserted > 0 {
      info!("Initialized default settings");
    }

    settings::Entity::find_by_id(SINGLETON_ID)
      .one(self.db)
      .await?
      .ok_or(Error::NotFound("Settings"))
  }

  pub async fn update(&self, patch: SettingsPatch) -> Result<settings::Model> {
    let current = self.get().await?;

    let mut settings: settings::ActiveModel = current.into();
    if let Some(automatic_invoicing) = patch.automatic_invoicing {
      settings.automatic_invoicing = Set(automatic_invoicing);
    }
    settings.updated_at = Set(utils::now());

    Ok(settings.update(self.db).await?)
  }
}
