use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use reelkeep_catalog::{NewPerformer, NewScene, NewStudio, NewTag};
use reelkeep_db::{QueryError, performer, scene, studio, tag};

use crate::{CliError, CreateEntity};

use super::open_library;

pub(crate) fn run_create(db: Option<PathBuf>, entity: CreateEntity) -> Result<(), CliError> {
    let (_, mut conn) = open_library(db)?;
    let tx = conn.transaction().map_err(QueryError::from)?;

    let (kind, id, label) = match entity {
        CreateEntity::Scene {
            path,
            checksum,
            title,
            details,
            url,
            date,
            rating,
            studio,
        } => {
            let mut new = NewScene::from_path(path);
            if let Some(checksum) = checksum {
                new.checksum = checksum;
            }
            new.title = title;
            new.details = details;
            new.url = url;
            new.date = date;
            new.rating = rating;
            new.studio_id = studio;
            let created = scene::create(&tx, &new)?;
            ("scene", created.id, created.path)
        }
        CreateEntity::Performer {
            name,
            url,
            gender,
            birthdate,
            ethnicity,
            country,
            favorite,
        } => {
            let mut new = NewPerformer::named(name);
            new.url = url;
            new.gender = gender;
            new.birthdate = birthdate;
            new.ethnicity = ethnicity;
            new.country = country;
            new.favorite = favorite;
            let created = performer::create(&tx, &new)?;
            ("performer", created.id, created.name.unwrap_or_default())
        }
        CreateEntity::Studio { name, url } => {
            let mut new = NewStudio::named(name);
            new.url = url;
            let created = studio::create(&tx, &new)?;
            ("studio", created.id, created.name.unwrap_or_default())
        }
        CreateEntity::Tag { name } => {
            let created = tag::create(&tx, &NewTag::named(name))?;
            ("tag", created.id, created.name)
        }
    };

    tx.commit().map_err(QueryError::from)?;

    log::info!(
        "{} {} #{} {}",
        "Created".if_supports_color(Stdout, |t| t.green()),
        kind,
        id,
        label.if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
