//! Sign in, sign up, sign out.

use anyhow::Result;
use aurum_auth::Credentials;
use aurum_commerce::customer::RegistrationForm;
use aurum_storefront::state::ReconcileReport;
use chrono::Utc;

use super::LoginArgs;
use crate::context::Context;
use crate::prompts;

/// Run the login command.
pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront().await?;
    if shop.auth.is_authenticated() {
        ctx.output
            .info(&format!("Ya iniciaste sesión como {}", shop.user().display_name()));
        return Ok(());
    }

    let email = match args.email {
        Some(email) => email,
        None => prompts::text("Email", "")?,
    };
    let password = prompts::secret("Contraseña")?;

    let spinner = ctx.output.spinner("Iniciando sesión...");
    let report = shop.login(Credentials::new(email, password)).await;
    spinner.finish_and_clear();
    let report = report?;

    ctx.output
        .success(&format!("Hola, {}", shop.user().display_name()));
    report_merge(&report, ctx);
    Ok(())
}

/// Run the register command.
pub async fn register(ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront().await?;
    let mut form = RegistrationForm::default();

    loop {
        form.name = prompts::text("Nombre", &form.name)?;
        form.email = prompts::text("Email", &form.email)?;
        form.phone = prompts::optional("Teléfono (opcional)", form.phone.as_deref())?;
        form.password = prompts::secret("Contraseña")?;
        form.password_confirmation = prompts::secret("Repite la contraseña")?;

        let spinner = ctx.output.spinner("Creando cuenta...");
        let result = shop.register(form.clone()).await;
        spinner.finish_and_clear();
        match result {
            Ok(report) => {
                ctx.output.success(&format!(
                    "Cuenta creada. Bienvenida/o, {}",
                    shop.user().display_name()
                ));
                report_merge(&report, ctx);
                return Ok(());
            }
            Err(e) if prompts::report_field_errors(&ctx.output, &e) => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

fn report_merge(report: &ReconcileReport, ctx: &Context) {
    if report.submitted > 0 {
        ctx.output.info(&format!(
            "{} productos de tu carrito se agregaron a tu cuenta",
            report.submitted
        ));
    }
    if report.failed > 0 {
        ctx.output.warn(&format!(
            "{} productos no se pudieron agregar a tu cuenta",
            report.failed
        ));
    }
}

/// Run the logout command.
pub async fn logout(ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront().await?;
    if !shop.auth.is_authenticated() {
        ctx.output.info("No hay una sesión iniciada");
        return Ok(());
    }
    shop.logout()?;
    ctx.output.success("Sesión cerrada");
    Ok(())
}

/// Run the whoami command.
pub async fn whoami(ctx: &Context) -> Result<()> {
    let shop = ctx.storefront().await?;
    let user = shop.user();

    if ctx.output.is_json() {
        ctx.output.json(&user);
        return Ok(());
    }

    let Some(session) = shop.auth.session() else {
        ctx.output.info("Navegando como invitado");
        return Ok(());
    };
    ctx.output.kv("Nombre", user.display_name());
    if let Some(email) = user.email() {
        ctx.output.kv("Email", email);
    }
    if let Some(role) = user.role() {
        ctx.output.kv("Rol", role.display_name());
    }
    let left = session.time_to_expiry(Utc::now());
    ctx.output.kv(
        "Sesión",
        &format!("expira en {}h {}m", left.num_hours(), left.num_minutes() % 60),
    );
    Ok(())
}
