//! Garden Commands
//!
//! Frontend bindings for garden CRUD endpoints.

use reqwest::Method;
use serde::Serialize;

use super::{ApiError, HttpApi};
use crate::models::{GardenId, RawGarden};

const GARDENS: &str = "api/gardens/gardens/";

fn garden_path(id: GardenId) -> String {
    format!("{}{}/", GARDENS, id)
}

// ========================
// Argument Structs
// ========================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateGardenArgs<'a> {
    pub name: &'a str,
    pub width: usize,
    pub height: usize,
}

/// Full replacement body for `PUT`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateGardenArgs<'a> {
    pub name: &'a str,
    pub width: usize,
    pub height: usize,
}

// ========================
// Commands
// ========================

impl HttpApi {
    pub async fn fetch_gardens(&self) -> Result<Vec<RawGarden>, ApiError> {
        let request = self.request(Method::GET, GARDENS)?;
        self.send_json(request).await
    }

    pub async fn post_garden(&self, args: &CreateGardenArgs<'_>) -> Result<RawGarden, ApiError> {
        let request = self.request(Method::POST, GARDENS)?.json(args);
        self.send_json(request).await
    }

    pub async fn put_garden(&self, id: GardenId, args: &UpdateGardenArgs<'_>) -> Result<(), ApiError> {
        let request = self.request(Method::PUT, &garden_path(id))?.json(args);
        self.send_empty(request).await
    }

    pub async fn remove_garden(&self, id: GardenId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &garden_path(id))?;
        self.send_empty(request).await
    }
}
