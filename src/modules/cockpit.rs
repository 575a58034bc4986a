//! System administration through Cockpit.

use crate::modules::{AppModule, MenuEntry, RunAs, SetupStep, ShortcutSpec};
use crate::service::ServiceSpec;

pub const MODULE: AppModule = AppModule {
    name: "cockpit",
    version: 1,
    title: "System Administration (Cockpit)",
    description: &[
        "Cockpit is a web-based system administration tool.",
        "When enabled, Cockpit's web interface will be available from /cockpit.",
    ],
    depends: &[],
    managed_packages: &["cockpit"],
    action: "cockpit",
    service: Some(ServiceSpec {
        unit: "cockpit",
        webserver_config: Some("cockpit-plinth"),
        ports: &["http", "https"],
        is_external: true,
    }),
    menu: MenuEntry {
        section: "system",
        icon: "glyphicon-refresh",
        url_name: "cockpit:index",
    },
    shortcut: Some(ShortcutSpec {
        url: "/cockpit",
        login_required: true,
    }),
    setup_steps: &[SetupStep {
        name: "post",
        args: &["enable"],
        run_as: RunAs::Superuser,
    }],
};
