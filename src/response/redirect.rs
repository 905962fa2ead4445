use url::Url;

use crate::response::HandlerError;

/// The page the browser lands on after a successful upload: the service
/// root, with any endpoint path and query dropped.
pub fn service_root(endpoint: &Url) -> Url {
    let mut root = endpoint.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}

pub fn open_in_browser(root: &Url) -> Result<(), HandlerError> {
    open::that(root.as_str()).map_err(HandlerError::Browser)
}
