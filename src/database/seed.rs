use tracing::info;

use crate::auth::Role;
use crate::database::models::{Company, Technician, User};
use crate::database::store::{HelpDeskStore, StoreError};
use crate::types::{CompanyId, DutyStatus};

/// Password shared by every demo account
pub const DEMO_PASSWORD: &str = "mesob123";

pub const MESOB: CompanyId = 1;
pub const ABAY: CompanyId = 2;

/// Load two tenants with admins, employees and technicians. No-op when companies exist.
pub async fn seed_demo(store: &dyn HelpDeskStore) -> Result<(), StoreError> {
    if !store.list_companies().await?.is_empty() {
        return Ok(());
    }

    store.insert_company(&Company::new(MESOB, "Mesob Trading")).await?;
    store.insert_company(&Company::new(ABAY, "Abay Bank")).await?;

    let users = [
        ("Selam Bekele", "sysadmin@mesob.et", Role::SystemAdmin, MESOB),
        ("Meron Alemu", "super@mesob.et", Role::SuperAdmin, MESOB),
        ("Kebede Tadesse", "admin@mesob.et", Role::CompanyAdmin, MESOB),
        ("Abebe Girma", "abebe@mesob.et", Role::Employee, MESOB),
        ("Liya Haile", "admin@abay.et", Role::CompanyAdmin, ABAY),
        ("Hana Tesfaye", "hana@abay.et", Role::Employee, ABAY),
    ];
    for (name, email, role, company_id) in users {
        store.insert_user(&User::new(name, email, DEMO_PASSWORD, role, company_id)).await?;
    }

    let technicians = [
        ("Tigist Wolde", "tigist@mesob.et", "Network", MESOB, DutyStatus::Online),
        ("Yonas Mekonnen", "yonas@mesob.et", "Hardware", MESOB, DutyStatus::Offline),
        ("Dawit Assefa", "dawit@abay.et", "IT Operations", ABAY, DutyStatus::OnSite),
    ];
    for (name, email, department, company_id, duty) in technicians {
        let technician = Technician::new(name, email, department, company_id, duty);
        let mut user = User::new(name, email, DEMO_PASSWORD, Role::Technician, company_id);
        user.technician_id = Some(technician.id);
        store.save_technician(&technician).await?;
        store.insert_user(&user).await?;
    }

    info!("Seeded demo data: 2 companies, 9 users, 3 technicians");
    Ok(())
}
