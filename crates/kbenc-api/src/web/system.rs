// Web API system endpoints
//
// Device-level discovery: firmware/uptime summary and the device list
// whose first entry identifies the encoder for the `kulabyte` namespace.

use tracing::debug;

use crate::auth::SessionToken;
use crate::error::Error;
use crate::transport::decode;
use crate::web::client::WebClient;
use crate::web::models::{WebDevice, WebSystemInfo};

impl WebClient {
    /// Get firmware version and uptime.
    ///
    /// `GET /api/system`
    pub async fn get_system(&self, session: &SessionToken) -> Result<WebSystemInfo, Error> {
        let url = self.fresh_endpoint(&["api", "system"])?;
        debug!("fetching system info");
        self.get(session, url).await
    }

    /// List encoder devices.
    ///
    /// `GET /api/devices` — a JSON array; anything else is reported as
    /// [`Error::UnexpectedShape`].
    pub async fn list_devices(&self, session: &SessionToken) -> Result<Vec<WebDevice>, Error> {
        let url = self.fresh_endpoint(&["api", "devices"])?;
        debug!("listing devices");
        let value = self.get_value(session, url).await?;
        if !value.is_array() {
            return Err(Error::UnexpectedShape {
                endpoint: "/api/devices".into(),
                expected: "array of devices",
            });
        }
        decode(value)
    }
}
