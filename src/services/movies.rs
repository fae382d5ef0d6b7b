//! Public browse pages, served through the read-through cache.

use serde::{Deserialize, Serialize};

use crate::cache::movies::{
    movie_crew_key, person_key, person_movies_key, show_key, CAROUSEL_KEY, SHOWS_KEY,
};
use crate::cache::CacheService;
use crate::database::Database;
use crate::error::{ApiResult, AppError};
use crate::models::{CarouselImage, CrewMember, Person, PersonMovie, ShowCard, ShowDetail};

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub carousel_images: Vec<CarouselImage>,
    pub shows: Vec<ShowCard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShowPage {
    pub show: ShowDetail,
    pub actors_crew: Vec<CrewMember>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PersonPage {
    pub person: Person,
    pub movies: Vec<PersonMovie>,
}

pub async fn home(db: &Database, cache: &CacheService) -> ApiResult<HomePage> {
    let carousel_images = cache
        .get_or_load(CAROUSEL_KEY, move || async move {
            Ok::<_, AppError>(CarouselImage::all(db).await?)
        })
        .await?;
    let shows = all_shows(db, cache).await?;

    Ok(HomePage {
        carousel_images,
        shows,
    })
}

pub async fn all_shows(db: &Database, cache: &CacheService) -> ApiResult<Vec<ShowCard>> {
    cache
        .get_or_load(SHOWS_KEY, move || async move { Ok::<_, AppError>(ShowCard::all(db).await?) })
        .await
}

pub async fn show_page(db: &Database, cache: &CacheService, show_id: i32) -> ApiResult<ShowPage> {
    let show = cache
        .get_or_load(&show_key(show_id), move || async move {
            ShowDetail::find(show_id, db)
                .await?
                .ok_or_else(|| AppError::not_found(format!("show not found by {} ID", show_id)))
        })
        .await?;

    let movie_id = show.movie_id;
    let actors_crew = cache
        .get_or_load(&movie_crew_key(movie_id), move || async move {
            Ok::<_, AppError>(CrewMember::for_movie(movie_id, db).await?)
        })
        .await?;

    Ok(ShowPage { show, actors_crew })
}

pub async fn person_page(
    db: &Database,
    cache: &CacheService,
    actor_crew_id: i32,
) -> ApiResult<PersonPage> {
    let person = cache
        .get_or_load(&person_key(actor_crew_id), move || async move {
            Person::find(actor_crew_id, db).await?.ok_or_else(|| {
                AppError::not_found(format!("actor or crew member {} not found", actor_crew_id))
            })
        })
        .await?;

    let movies = cache
        .get_or_load(&person_movies_key(actor_crew_id), move || async move {
            Ok::<_, AppError>(PersonMovie::for_person(actor_crew_id, db).await?)
        })
        .await?;

    Ok(PersonPage { person, movies })
}
