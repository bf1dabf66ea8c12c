/*
 * Responsibility
 * - axum::Json の rejection (壊れた JSON, Content-Type 不一致など) を
 *   AppError::BadRequest に寄せて、エラーボディの形を揃える
 */
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

const MSG_INVALID_BODY: &str = "Invalid request body";

pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                AppError::bad_request(MSG_INVALID_BODY, Some(rejection.body_text()))
            })?;
        Ok(Self(value))
    }
}
