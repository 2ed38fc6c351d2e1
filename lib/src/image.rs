//! Image entries of the gallery and tribute collections.
//!
//! Both collections hold the same kind of document. The image itself is an
//! opaque encoded string (usually a data url) stored verbatim; it's never
//! decoded or inspected.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::collection::Document;
use crate::db::{Collectable, Identifiable};

/// Names the collection a set of images is stored in.
pub trait Album: Send + Sync + 'static {
    const COLLECTION: &'static str;
}

#[derive(Clone, Copy, Debug)]
pub enum Gallery {}

impl Album for Gallery {
    const COLLECTION: &'static str = "gallery";
}

#[derive(Clone, Copy, Debug)]
pub enum Tribute {}

impl Album for Tribute {
    const COLLECTION: &'static str = "tribute";
}

pub type GalleryImage = Image<Gallery>;
pub type TributeImage = Image<Tribute>;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Image<A> {
    pub id: Uuid,
    pub image_data: String,
    #[serde(default)]
    pub caption: String,
    pub timestamp: DateTime<Utc>,

    #[serde(skip)]
    album: PhantomData<A>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageInput {
    pub image_data: String,
    #[serde(default)]
    pub caption: Option<String>,
}

impl<A: Album> Collectable for Image<A> {
    fn get_collection_name() -> &'static str {
        A::COLLECTION
    }
}

impl<A> Identifiable for Image<A> {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

impl<A: Album> Document for Image<A> {
    type Input = ImageInput;
    const NAME: &'static str = "image";

    fn from_input(input: ImageInput, id: Uuid, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            image_data: input.image_data,
            caption: input.caption.unwrap_or_default(),
            timestamp,
            album: PhantomData,
        }
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
