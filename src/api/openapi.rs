//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Circulation API",
        version = "1.0.0",
        description = "Library circulation service REST API - loans, returns and availability"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Loans
        loans::create_loan,
        loans::return_loan,
        loans::extend_loan,
        loans::get_loan,
        loans::get_user_loans,
        loans::get_overdue_loans,
    ),
    components(
        schemas(
            // Loans
            loans::IssueLoanRequest,
            loans::ExtendLoanRequest,
            loans::ReturnResponse,
            loans::ExtendResponse,
            loans::UserLoansResponse,
            loans::OverdueLoansResponse,
            crate::models::loan::Loan,
            crate::models::loan::LoanStatus,
            crate::models::loan::LoanDetails,
            crate::models::loan::LoanFull,
            crate::models::loan::OverdueLoan,
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::user::User,
            crate::models::user::UserShort,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "loans", description = "Loan issuance, return and extension")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
