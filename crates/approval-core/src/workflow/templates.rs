//! Route template registry
//!
//! Fixed catalogue mapping each template code to its ordered role
//! sequence. Step orders are implicit: position 1..=len, contiguous.

use approval_types::{Role, TemplateCode};

/// Ordered role sequence registered for a template.
pub fn template_steps(template: TemplateCode) -> &'static [Role] {
    match template {
        TemplateCode::AdminFinal => &[Role::Drafter, Role::Admin],
        TemplateCode::Normal => &[Role::Drafter, Role::Admin, Role::Chairman],
        TemplateCode::AdminToChair => &[Role::Admin, Role::Chairman],
        TemplateCode::AdminToAuditorChair => &[Role::Admin, Role::Auditor, Role::Chairman],
    }
}

/// Role that files documents under this template (always the first step).
pub fn filer_role(template: TemplateCode) -> Role {
    template_steps(template)[0]
}

/// Approver roles in order, excluding the filer.
///
/// Used by notification texts: NORMAL yields [admin, chairman] while
/// ADMIN_TO_CHAIR, where the admin is the filer, yields [chairman].
pub fn approver_roles(template: TemplateCode) -> Vec<Role> {
    let filer = filer_role(template);
    template_steps(template)
        .iter()
        .copied()
        .filter(|r| *r != filer)
        .collect()
}
