use common::directory::RefreshTicket;
use common::capture::SubmitTicket;
use common::map_view::ViewState;
use common::model::{BusinessRecord, Coordinates, PowerType, RecordId};
use common::store::StoreResult;

#[derive(Clone)]
pub enum Msg {
    Refresh,
    Refreshed(RefreshTicket, StoreResult<Vec<BusinessRecord>>),
    ViewportChanged(ViewState),
    MapClicked(Coordinates),
    SetSearch(String),
    SetCategory(String),
    FocusBusiness(RecordId),
    OpenAdmin,
    CancelAdmin,
    EditName(String),
    EditCategory(String),
    EditPowerType(PowerType),
    EditCardPayment(bool),
    EditPhotoUrl(String),
    Save,
    Saved(SubmitTicket, StoreResult<BusinessRecord>),
}
