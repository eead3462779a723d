//! The KSIS list boards.
//!
//! Each board is a [`BoardSpec`] constant: where its rows come from, how
//! many fit on a page, which categories can be searched and which bulk
//! actions are offered.

use crate::api::BulkAction;
use crate::api::BulkKind;
use crate::api::RequestShape;
use crate::api::query::ListQueryController;
use crate::api::query::ParamNames;
use crate::api::query::SearchCategory;
use crate::auth::UserContext;

/// Static description of one list board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSpec {
    /// Short name, also used by the CLI.
    pub name: &'static str,
    /// List endpoint, relative to the backend base URL.
    pub endpoint: &'static str,
    pub page_size: u32,
    /// Closed set of search categories; the first is the default.
    pub categories: &'static [SearchCategory],
    pub params: ParamNames,
    pub actions: &'static [BulkAction],
    /// Only administrators can open the board.
    pub admin_only: bool,
}

impl BoardSpec {
    /// Categories offered to `user`.
    pub fn visible_categories(&self, user: &UserContext) -> Vec<SearchCategory> {
        self.categories
            .iter()
            .filter(|c| !c.admin_only || user.is_admin())
            .copied()
            .collect()
    }

    /// The bulk action of the given kind, if the board has one.
    pub fn action(&self, kind: BulkKind) -> Option<&'static BulkAction> {
        self.actions.iter().find(|a| a.kind == kind)
    }

    /// Whether `user` may open the board at all.
    pub fn is_visible_to(&self, user: &UserContext) -> bool {
        !self.admin_only || user.is_admin()
    }

    /// A query controller for this board as seen by `user`.
    pub fn controller(&self, user: &UserContext) -> ListQueryController {
        ListQueryController::new(self.page_size, self.visible_categories(user))
    }
}

pub const ACCOUNTS: BoardSpec = BoardSpec {
    name: "accounts",
    endpoint: "/account/accountList",
    page_size: 10,
    categories: &[
        SearchCategory::text("accountId", "ID"),
        SearchCategory::text("name", "Name"),
        SearchCategory::text("email", "Email"),
    ],
    params: ParamNames::DEFAULT,
    actions: &[
        BulkAction::new(
            BulkKind::Activate,
            "/account/activate",
            RequestShape::JsonArray,
        ),
        BulkAction::new(
            BulkKind::Deactivate,
            "/account/deactivate",
            RequestShape::JsonArray,
        ),
    ],
    admin_only: true,
};

pub const PCS: BoardSpec = BoardSpec {
    name: "pcs",
    endpoint: "/pc/posts",
    page_size: 10,
    categories: DEVICE_CATEGORIES,
    params: ParamNames::DEFAULT,
    actions: &[BulkAction::new(
        BulkKind::Delete,
        "/pc",
        RequestShape::CommaJoined { param: "deviceIds" },
    )],
    admin_only: false,
};

pub const SIGNAGES: BoardSpec = BoardSpec {
    name: "signages",
    endpoint: "/signage/posts",
    page_size: 10,
    categories: DEVICE_CATEGORIES,
    params: ParamNames::DEFAULT,
    actions: &[BulkAction::new(
        BulkKind::Delete,
        "/signage",
        RequestShape::CommaJoined { param: "deviceIds" },
    )],
    admin_only: false,
};

pub const RESOLUTIONS: BoardSpec = BoardSpec {
    name: "resolutions",
    endpoint: "/resolution/posts",
    page_size: 5,
    categories: &[
        SearchCategory::text("title", "Title"),
        SearchCategory::text("width", "Width"),
        SearchCategory::text("height", "Height"),
    ],
    params: ParamNames::DEFAULT,
    actions: &[BulkAction::new(
        BulkKind::Delete,
        "/resolution",
        RequestShape::PerId,
    )],
    admin_only: true,
};

pub const ACCESS_LOGS: BoardSpec = BoardSpec {
    name: "access-logs",
    endpoint: "/log/access",
    page_size: 16,
    categories: &[
        SearchCategory::text("accountId", "Account"),
        SearchCategory::text("microServiceName", "Service"),
        SearchCategory::date("regDate", "Date"),
        SearchCategory::text("ip", "IP address").admin_only(),
    ],
    params: ParamNames::DEFAULT,
    actions: &[],
    admin_only: false,
};

pub const NOTICES: BoardSpec = BoardSpec {
    name: "notices",
    endpoint: "/notice/posts",
    page_size: 10,
    categories: &[
        SearchCategory::text("title", "Title"),
        SearchCategory::text("accountId", "Author").admin_only(),
        SearchCategory::date("regDate", "Registered"),
    ],
    params: ParamNames::DEFAULT,
    actions: &[BulkAction::new(BulkKind::Delete, "/notice", RequestShape::PerId)],
    admin_only: false,
};

pub const MEDIA_FILES: BoardSpec = BoardSpec {
    name: "media",
    endpoint: "/file/original/posts",
    page_size: 16,
    categories: &[
        SearchCategory::text("fileTitle", "Title"),
        SearchCategory::text("resolution", "Resolution"),
        SearchCategory::date("regDate", "Uploaded"),
    ],
    params: ParamNames::DEFAULT,
    actions: &[BulkAction::new(
        BulkKind::Delete,
        "/file",
        RequestShape::JsonArray,
    )],
    admin_only: false,
};

pub const API_KEYS: BoardSpec = BoardSpec {
    name: "api-keys",
    endpoint: "/api/posts",
    page_size: 10,
    categories: &[
        SearchCategory::text("customId", "Owner"),
        SearchCategory::date("expiryDate", "Expires"),
    ],
    params: ParamNames::DEFAULT,
    actions: &[BulkAction::new(BulkKind::Delete, "/api", RequestShape::PerId)],
    admin_only: true,
};

const DEVICE_CATEGORIES: &[SearchCategory] = &[
    SearchCategory::text("deviceName", "Name"),
    SearchCategory::text("location", "Location"),
    SearchCategory::text("macAddress", "MAC address").admin_only(),
];

/// Every board, in menu order.
pub const ALL: &[BoardSpec] = &[
    ACCOUNTS,
    PCS,
    SIGNAGES,
    RESOLUTIONS,
    ACCESS_LOGS,
    NOTICES,
    MEDIA_FILES,
    API_KEYS,
];

/// Looks a board up by name.
pub fn find(name: &str) -> Option<&'static BoardSpec> {
    ALL.iter().find(|b| b.name == name)
}
