//! Repositorio de contratos

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::contract::{Contract, ContractStatus};
use crate::utils::errors::AppError;

/// Alcance de visibilidad del listado según el rol del solicitante
#[derive(Debug, Clone, Copy)]
pub enum ContractScope {
    All,
    Station(Uuid),
    Renter(Uuid),
}

pub struct ContractRepository {
    pool: PgPool,
}

impl ContractRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserta el contrato borrador dentro de la transacción del paso 3
    #[allow(clippy::too_many_arguments)]
    pub async fn create_in(
        &self,
        conn: &mut PgConnection,
        contract_number: String,
        inspection_id: Uuid,
        booking_id: Uuid,
        renter_id: Uuid,
        staff_id: Uuid,
        terms: String,
        daily_rate: Decimal,
        deposit_amount: Decimal,
    ) -> Result<Contract, AppError> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts (
                id, contract_number, inspection_id, booking_id, renter_id, staff_id,
                status, terms, daily_rate, deposit_amount, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'draft', $7, $8, $9, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(contract_number)
        .bind(inspection_id)
        .bind(booking_id)
        .bind(renter_id)
        .bind(staff_id)
        .bind(terms)
        .bind(daily_rate)
        .bind(deposit_amount)
        .fetch_one(&mut *conn)
        .await?;

        Ok(contract)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Contract>, AppError> {
        let contract = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contract)
    }

    pub async fn find_by_inspection(&self, inspection_id: Uuid) -> Result<Option<Contract>, AppError> {
        let contract =
            sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE inspection_id = $1")
                .bind(inspection_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(contract)
    }

    /// Listado paginado con filtro de estado y alcance por rol
    pub async fn list(
        &self,
        scope: ContractScope,
        status: Option<ContractStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Contract>, i64), AppError> {
        let contracts = {
            let mut qb = self.filtered_query("SELECT c.* FROM contracts c", scope, status);
            qb.push(" ORDER BY c.created_at DESC LIMIT ");
            qb.push_bind(limit);
            qb.push(" OFFSET ");
            qb.push_bind(offset);

            qb.build_query_as::<Contract>().fetch_all(&self.pool).await?
        };

        let total = {
            let mut qb = self.filtered_query("SELECT COUNT(*) FROM contracts c", scope, status);
            qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?
        };

        Ok((contracts, total))
    }

    fn filtered_query(
        &self,
        select: &str,
        scope: ContractScope,
        status: Option<ContractStatus>,
    ) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(select.to_string());
        qb.push(" JOIN bookings b ON b.id = c.booking_id WHERE 1 = 1");

        match scope {
            ContractScope::All => {}
            ContractScope::Station(id) => {
                qb.push(" AND b.station_id = ");
                qb.push_bind(id);
            }
            ContractScope::Renter(id) => {
                qb.push(" AND c.renter_id = ");
                qb.push_bind(id);
            }
        }

        if let Some(status) = status {
            qb.push(" AND c.status = ");
            qb.push_bind(status);
        }

        qb
    }

    /// Transición de estado condicionada al estado previo. Devuelve None
    /// si el contrato ya no estaba en `from` (guardia de orden de estados).
    pub async fn transition_status(
        &self,
        id: Uuid,
        from: ContractStatus,
        to: ContractStatus,
    ) -> Result<Option<Contract>, AppError> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            UPDATE contracts
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contract)
    }

    /// Firma condicionada: solo sobre contratos activos y sin firma previa
    /// de la misma parte. Devuelve None si otra request ganó la carrera.
    pub async fn sign_as_renter(&self, id: Uuid) -> Result<Option<Contract>, AppError> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            UPDATE contracts
            SET renter_signed_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'active' AND renter_signed_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contract)
    }

    pub async fn sign_as_staff(&self, id: Uuid) -> Result<Option<Contract>, AppError> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            UPDATE contracts
            SET staff_signed_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'active' AND staff_signed_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contract)
    }

    pub async fn mark_completed(&self, id: Uuid) -> Result<Option<Contract>, AppError> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            UPDATE contracts
            SET status = 'completed', completed_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = 'active'
              AND renter_signed_at IS NOT NULL AND staff_signed_at IS NOT NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contract)
    }

    /// Anula el contrato dentro de una transacción (también usada por el
    /// rechazo de la sesión de check-in)
    pub async fn void_in(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        reason: String,
    ) -> Result<Option<Contract>, AppError> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            UPDATE contracts
            SET status = 'voided', voided_at = NOW(), void_reason = $2, updated_at = NOW()
            WHERE id = $1 AND status IN ('draft', 'active')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reason)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(contract)
    }
}
