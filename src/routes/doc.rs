use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        appointments::{
            AppointmentList, CreateAppointmentRequest, PaymentInput, UpdateAppointmentRequest,
            UpdateAppointmentStatusRequest,
        },
        auth::{
            AuthResponse, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest,
            LogoutRequest, RefreshTokenRequest, RegisterRequest, ResetPasswordRequest,
            TokenPairResponse,
        },
        statistics::{
            AverageRevenue, FinancialReport, FinancialStats, MonthlyBucket, MostSelectedServices,
            ProfitReport, RegistrationBucket, RegistrationStats, RevenueReport, ServiceCount,
        },
    },
    models::{
        Account, AccountSummary, Appointment, AppointmentDetail, Category, CategoryDetail, Combo,
        ComboDetail, Contact, ContactDetail, Location, Payment, Review, ReviewDetail, Salon,
        SalonDetail, Service, ShowTime, ShowTimeDetail,
    },
    response::{ApiResponse, Meta},
    routes::{
        accounts, appointments, auth, categories, combos, contacts, health, images, locations,
        params, payments, reviews, salons, search, services as service_routes, show_times,
        statistics,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::refresh_token,
        auth::forgot_password,
        auth::reset_password,
        auth::logout,
        accounts::get_profile,
        accounts::update_profile,
        accounts::change_password,
        accounts::list_accounts,
        accounts::create_account,
        accounts::get_account,
        accounts::update_account,
        accounts::delete_account,
        locations::list_locations,
        locations::get_location,
        locations::create_location,
        locations::update_location,
        locations::delete_location,
        salons::list_salons,
        salons::get_salon,
        salons::create_salon,
        salons::update_salon,
        salons::delete_salon,
        service_routes::list_services,
        service_routes::get_service,
        service_routes::create_service,
        service_routes::update_service,
        service_routes::delete_service,
        combos::list_combos,
        combos::get_combo,
        combos::create_combo,
        combos::update_combo,
        combos::delete_combo,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        payments::create_payment,
        payments::list_payments,
        payments::get_payment,
        payments::update_payment,
        payments::delete_payment,
        appointments::create_appointment,
        appointments::list_appointments,
        appointments::get_appointment,
        appointments::list_by_account,
        appointments::update_appointment,
        appointments::update_appointment_status,
        appointments::delete_appointment,
        reviews::create_review,
        reviews::list_reviews,
        reviews::get_review,
        reviews::update_review,
        reviews::delete_review,
        show_times::list_show_times,
        show_times::get_show_time,
        show_times::create_show_time,
        show_times::update_show_time,
        show_times::delete_show_time,
        contacts::create_contact,
        contacts::list_contacts,
        contacts::get_contact,
        contacts::update_contact,
        contacts::delete_contact,
        statistics::revenue,
        statistics::revenue_by_salon,
        statistics::profit,
        statistics::profit_by_salon,
        statistics::financial_report,
        statistics::financial_report_by_salon,
        statistics::financial_stats,
        statistics::registration_stats,
        statistics::most_service,
        statistics::average_revenue_per_appointment,
        search::search_all,
        search::search_salon,
        images::upload_image,
        images::replace_image,
        images::delete_image,
        images::display_image,
    ),
    components(
        schemas(
            Account,
            AccountSummary,
            Location,
            Salon,
            SalonDetail,
            Service,
            Combo,
            ComboDetail,
            Category,
            CategoryDetail,
            Payment,
            Appointment,
            AppointmentDetail,
            Review,
            ReviewDetail,
            ShowTime,
            ShowTimeDetail,
            Contact,
            ContactDetail,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            RefreshTokenRequest,
            TokenPairResponse,
            ForgotPasswordRequest,
            ForgotPasswordResponse,
            ResetPasswordRequest,
            LogoutRequest,
            CreateAppointmentRequest,
            UpdateAppointmentRequest,
            UpdateAppointmentStatusRequest,
            AppointmentList,
            PaymentInput,
            RevenueReport,
            ProfitReport,
            FinancialReport,
            FinancialStats,
            MonthlyBucket,
            RegistrationStats,
            RegistrationBucket,
            MostSelectedServices,
            ServiceCount,
            AverageRevenue,
            accounts::AccountList,
            accounts::CreateAccountRequest,
            accounts::UpdateAccountRequest,
            accounts::UpdateProfileRequest,
            accounts::ChangePasswordRequest,
            locations::LocationList,
            locations::CreateLocationRequest,
            locations::UpdateLocationRequest,
            salons::SalonList,
            salons::CreateSalonRequest,
            salons::UpdateSalonRequest,
            service_routes::ServiceList,
            service_routes::ServiceWithReviews,
            service_routes::ServiceWithReviewDetails,
            service_routes::CreateServiceRequest,
            service_routes::UpdateServiceRequest,
            combos::ComboList,
            combos::CreateComboRequest,
            combos::UpdateComboRequest,
            categories::CategoryList,
            categories::CreateCategoryRequest,
            categories::UpdateCategoryRequest,
            payments::PaymentList,
            payments::CreatePaymentRequest,
            payments::UpdatePaymentRequest,
            reviews::ReviewList,
            reviews::CreateReviewRequest,
            reviews::UpdateReviewRequest,
            show_times::ShowTimeList,
            show_times::CreateShowTimeRequest,
            show_times::UpdateShowTimeRequest,
            contacts::ContactList,
            contacts::CreateContactRequest,
            contacts::UpdateContactRequest,
            search::SearchResults,
            search::SalonSearchResult,
            images::UploadedImage,
            params::Pagination,
            params::ShowTimeQuery,
            params::SearchQuery,
            Meta,
            ApiResponse<Account>,
            ApiResponse<SalonDetail>,
            ApiResponse<AppointmentDetail>,
            ApiResponse<AppointmentList>,
            ApiResponse<RevenueReport>,
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Accounts", description = "Account endpoints"),
        (name = "Locations", description = "Location endpoints"),
        (name = "Salons", description = "Salon endpoints"),
        (name = "Services", description = "Service endpoints"),
        (name = "Combos", description = "Combo endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Payments", description = "Payment endpoints"),
        (name = "Appointments", description = "Appointment endpoints"),
        (name = "Reviews", description = "Review endpoints"),
        (name = "ShowTimes", description = "Show-time endpoints"),
        (name = "Contacts", description = "Contact endpoints"),
        (name = "Statistics", description = "Revenue and usage statistics"),
        (name = "Search", description = "Name search across salons"),
        (name = "Images", description = "Image upload and serving"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
