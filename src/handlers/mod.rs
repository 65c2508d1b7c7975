// Route handlers
//
// root                -> GET /, GET /health (public)
// selected_calendars  -> /selected-calendars (API key required)
pub mod root;
pub mod selected_calendars;
