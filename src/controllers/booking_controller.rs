//! Controller de consulta de reservas

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::booking_dto::{BookingFilters, BookingResponse};
use crate::dto::common::{PaginatedResponse, PaginationParams};
use crate::middleware::auth::AuthenticatedAccount;
use crate::models::account::AccountRole;
use crate::repositories::account_repository::AccountRepository;
use crate::repositories::booking_repository::{BookingRepository, BookingScope};
use crate::utils::errors::AppError;

pub struct BookingController {
    accounts: AccountRepository,
    repository: BookingRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            repository: BookingRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        auth: &AuthenticatedAccount,
        filters: BookingFilters,
    ) -> Result<PaginatedResponse<BookingResponse>, AppError> {
        let scope = self.scope_for(auth).await?;

        let pagination = PaginationParams {
            page: filters.page,
            per_page: filters.per_page,
        };
        let (page, per_page) = pagination.normalize();

        let (rows, total) = self
            .repository
            .list(
                scope,
                filters.status,
                filters.station_id,
                filters.q.as_deref(),
                per_page,
                pagination.offset(),
            )
            .await?;

        let items = rows.into_iter().map(Into::into).collect();

        Ok(PaginatedResponse::new(items, total, page, per_page))
    }

    pub async fn get_by_id(
        &self,
        auth: &AuthenticatedAccount,
        id: Uuid,
    ) -> Result<BookingResponse, AppError> {
        let row = self
            .repository
            .find_row_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        // Verificar visibilidad según rol
        match auth.role {
            AccountRole::Admin => {}
            AccountRole::Staff => {
                if !auth.can_access_station(row.station_id) {
                    return Err(AppError::Forbidden(
                        "La reserva pertenece a otra estación".to_string(),
                    ));
                }
            }
            AccountRole::Renter => {
                let renter = self
                    .accounts
                    .find_renter_by_account(auth.account_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Forbidden("La cuenta no tiene perfil de cliente".to_string())
                    })?;

                if renter.id != row.renter_id {
                    return Err(AppError::Forbidden(
                        "La reserva pertenece a otro cliente".to_string(),
                    ));
                }
            }
        }

        Ok(row.into())
    }

    async fn scope_for(&self, auth: &AuthenticatedAccount) -> Result<BookingScope, AppError> {
        match auth.role {
            AccountRole::Admin => Ok(BookingScope::All),
            AccountRole::Staff => {
                let station_id = auth.station_id.ok_or_else(|| {
                    AppError::Forbidden("La cuenta no tiene estación asignada".to_string())
                })?;
                Ok(BookingScope::Station(station_id))
            }
            AccountRole::Renter => {
                let renter = self
                    .accounts
                    .find_renter_by_account(auth.account_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Forbidden("La cuenta no tiene perfil de cliente".to_string())
                    })?;
                Ok(BookingScope::Renter(renter.id))
            }
        }
    }
}
