pub mod http;

pub use http::{
    create_router, error_message, get_status, post_balance, post_events, ApiError, ApiServer, AppState,
    BalanceResponse, Endpoint, ErrorResponse, EventsResponse, StatusResponse,
};
