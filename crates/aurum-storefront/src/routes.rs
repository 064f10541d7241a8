//! Page routes and access guards.

use aurum_auth::User;
use aurum_commerce::{CategoryId, CollectionId, ProductId};
use std::fmt;

/// Who may open a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Signed-in customers and admins.
    Authenticated,
    Admin,
}

/// Back-office pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminSection {
    Dashboard,
    Products,
    Categories,
    Collections,
    Users,
    Messages,
    Orders,
}

impl AdminSection {
    fn segment(&self) -> Option<&'static str> {
        match self {
            AdminSection::Dashboard => None,
            AdminSection::Products => Some("productos"),
            AdminSection::Categories => Some("categorias"),
            AdminSection::Collections => Some("colecciones"),
            AdminSection::Users => Some("usuarios"),
            AdminSection::Messages => Some("mensajes"),
            AdminSection::Orders => Some("pedidos"),
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        Some(match segment {
            "productos" => AdminSection::Products,
            "categorias" => AdminSection::Categories,
            "colecciones" => AdminSection::Collections,
            "usuarios" => AdminSection::Users,
            "mensajes" => AdminSection::Messages,
            "pedidos" => AdminSection::Orders,
            _ => return None,
        })
    }
}

/// A page of the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Products,
    ProductDetail(ProductId),
    Category(CategoryId),
    Collection(CollectionId),
    Search { query: Option<String> },
    Cart,
    Checkout,
    Login,
    Register,
    Contact,
    Profile,
    Admin(AdminSection),
    NotFound(String),
}

/// One row of the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteInfo {
    pub pattern: &'static str,
    pub access: Access,
    pub title: &'static str,
}

/// Every page pattern, in matching order.
pub const ROUTE_TABLE: &[RouteInfo] = &[
    RouteInfo { pattern: "/", access: Access::Public, title: "Inicio" },
    RouteInfo { pattern: "/productos", access: Access::Public, title: "Productos" },
    RouteInfo { pattern: "/productos/:id", access: Access::Public, title: "Detalle de producto" },
    RouteInfo { pattern: "/categorias/:id", access: Access::Public, title: "Categoría" },
    RouteInfo { pattern: "/colecciones/:id", access: Access::Public, title: "Colección" },
    RouteInfo { pattern: "/buscar", access: Access::Public, title: "Búsqueda" },
    RouteInfo { pattern: "/carrito", access: Access::Public, title: "Carrito" },
    RouteInfo { pattern: "/checkout", access: Access::Authenticated, title: "Checkout" },
    RouteInfo { pattern: "/login", access: Access::Public, title: "Iniciar sesión" },
    RouteInfo { pattern: "/registro", access: Access::Public, title: "Crear cuenta" },
    RouteInfo { pattern: "/contacto", access: Access::Public, title: "Contacto" },
    RouteInfo { pattern: "/perfil", access: Access::Authenticated, title: "Mi perfil" },
    RouteInfo { pattern: "/admin", access: Access::Admin, title: "Panel de administración" },
    RouteInfo { pattern: "/admin/productos", access: Access::Admin, title: "Administrar productos" },
    RouteInfo { pattern: "/admin/categorias", access: Access::Admin, title: "Administrar categorías" },
    RouteInfo { pattern: "/admin/colecciones", access: Access::Admin, title: "Administrar colecciones" },
    RouteInfo { pattern: "/admin/usuarios", access: Access::Admin, title: "Administrar usuarios" },
    RouteInfo { pattern: "/admin/mensajes", access: Access::Admin, title: "Mensajes" },
    RouteInfo { pattern: "/admin/pedidos", access: Access::Admin, title: "Pedidos" },
];

impl Route {
    /// Match a path such as `/productos/7` or `/buscar?q=anillo`.
    pub fn parse(input: &str) -> Route {
        let input = input.trim();
        let (path, query) = match input.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (input, None),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["productos"] => Route::Products,
            ["productos", id] => Route::ProductDetail(ProductId::new(*id)),
            ["categorias", id] => Route::Category(CategoryId::new(*id)),
            ["colecciones", id] => Route::Collection(CollectionId::new(*id)),
            ["buscar"] => Route::Search {
                query: query.and_then(search_text),
            },
            ["carrito"] => Route::Cart,
            ["checkout"] => Route::Checkout,
            ["login"] => Route::Login,
            ["registro"] => Route::Register,
            ["contacto"] => Route::Contact,
            ["perfil"] => Route::Profile,
            ["admin"] => Route::Admin(AdminSection::Dashboard),
            ["admin", section] => match AdminSection::from_segment(section) {
                Some(section) => Route::Admin(section),
                None => Route::NotFound(path.to_string()),
            },
            _ => Route::NotFound(path.to_string()),
        }
    }

    /// Canonical path.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Products => "/productos".to_string(),
            Route::ProductDetail(id) => format!("/productos/{id}"),
            Route::Category(id) => format!("/categorias/{id}"),
            Route::Collection(id) => format!("/colecciones/{id}"),
            Route::Search { query: None } => "/buscar".to_string(),
            Route::Search { query: Some(q) } => {
                let encoded: String = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("q", q)
                    .finish();
                format!("/buscar?{encoded}")
            }
            Route::Cart => "/carrito".to_string(),
            Route::Checkout => "/checkout".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/registro".to_string(),
            Route::Contact => "/contacto".to_string(),
            Route::Profile => "/perfil".to_string(),
            Route::Admin(section) => match section.segment() {
                Some(segment) => format!("/admin/{segment}"),
                None => "/admin".to_string(),
            },
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Row of [`ROUTE_TABLE`] this route matched, if any.
    pub fn info(&self) -> Option<&'static RouteInfo> {
        let pattern = match self {
            Route::Home => "/",
            Route::Products => "/productos",
            Route::ProductDetail(_) => "/productos/:id",
            Route::Category(_) => "/categorias/:id",
            Route::Collection(_) => "/colecciones/:id",
            Route::Search { .. } => "/buscar",
            Route::Cart => "/carrito",
            Route::Checkout => "/checkout",
            Route::Login => "/login",
            Route::Register => "/registro",
            Route::Contact => "/contacto",
            Route::Profile => "/perfil",
            Route::Admin(AdminSection::Dashboard) => "/admin",
            Route::Admin(AdminSection::Products) => "/admin/productos",
            Route::Admin(AdminSection::Categories) => "/admin/categorias",
            Route::Admin(AdminSection::Collections) => "/admin/colecciones",
            Route::Admin(AdminSection::Users) => "/admin/usuarios",
            Route::Admin(AdminSection::Messages) => "/admin/mensajes",
            Route::Admin(AdminSection::Orders) => "/admin/pedidos",
            Route::NotFound(_) => return None,
        };
        ROUTE_TABLE.iter().find(|info| info.pattern == pattern)
    }

    pub fn access(&self) -> Access {
        self.info().map_or(Access::Public, |info| info.access)
    }

    pub fn title(&self) -> &'static str {
        self.info().map_or("Página no encontrada", |info| info.title)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Route::Admin(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn search_text(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// What the page layer should do with a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    /// Guard failed. `next` is the page to return to after signing in.
    Redirect { to: Route, next: Option<String> },
}

/// Match `path` and apply the access guard for `user`.
pub fn resolve(path: &str, user: &User) -> Resolution {
    let route = Route::parse(path);
    match route.access() {
        Access::Public => Resolution::Render(route),
        Access::Authenticated if user.is_authenticated() => Resolution::Render(route),
        Access::Authenticated => Resolution::Redirect {
            to: Route::Login,
            next: Some(route.path()),
        },
        Access::Admin if user.is_admin() => Resolution::Render(route),
        Access::Admin => {
            tracing::debug!(path = %route, user = user.display_name(), "admin route refused");
            Resolution::Redirect {
                to: Route::Home,
                next: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurum_commerce::customer::Role;
    use aurum_commerce::CustomerId;

    fn signed_in(role: Role) -> User {
        User::Authenticated {
            id: CustomerId::new("1"),
            email: "ana@correo.cl".to_string(),
            name: "Ana".to_string(),
            role,
        }
    }

    #[test]
    fn test_parse_table_patterns() {
        for info in ROUTE_TABLE {
            let path = info.pattern.replace(":id", "42");
            let route = Route::parse(&path);
            assert_eq!(route.info(), Some(info), "{path}");
            assert_eq!(route.path(), path);
        }
    }

    #[test]
    fn test_parse_params_and_slashes() {
        assert_eq!(
            Route::parse("/productos/7/"),
            Route::ProductDetail(ProductId::new("7"))
        );
        assert_eq!(
            Route::parse("/buscar?q=anillo+de+plata"),
            Route::Search {
                query: Some("anillo de plata".to_string())
            }
        );
        assert_eq!(Route::parse("/buscar?q=%20"), Route::Search { query: None });
    }

    #[test]
    fn test_search_path_round_trip() {
        let route = Route::Search {
            query: Some("aros & collares".to_string()),
        };
        assert_eq!(Route::parse(&route.path()), route);
    }

    #[test]
    fn test_unknown_paths() {
        assert_eq!(Route::parse("/ofertas"), Route::NotFound("/ofertas".to_string()));
        assert_eq!(
            Route::parse("/admin/secreto"),
            Route::NotFound("/admin/secreto".to_string())
        );
        assert_eq!(Route::parse("/ofertas").title(), "Página no encontrada");
    }

    #[test]
    fn test_guest_is_sent_to_login() {
        let guest = User::anonymous();
        assert_eq!(
            resolve("/checkout", &guest),
            Resolution::Redirect {
                to: Route::Login,
                next: Some("/checkout".to_string())
            }
        );
        assert!(matches!(resolve("/perfil", &guest), Resolution::Redirect { to: Route::Login, .. }));
        assert!(matches!(resolve("/carrito", &guest), Resolution::Render(Route::Cart)));
    }

    #[test]
    fn test_admin_guard() {
        let customer = signed_in(Role::Customer);
        let admin = signed_in(Role::Admin);

        assert_eq!(
            resolve("/admin/productos", &customer),
            Resolution::Redirect { to: Route::Home, next: None }
        );
        assert_eq!(
            resolve("/admin/productos", &User::anonymous()),
            Resolution::Redirect { to: Route::Home, next: None }
        );
        assert_eq!(
            resolve("/admin/productos", &admin),
            Resolution::Render(Route::Admin(AdminSection::Products))
        );
        assert!(matches!(resolve("/checkout", &customer), Resolution::Render(Route::Checkout)));
    }

    #[test]
    fn test_not_found_renders() {
        assert_eq!(
            resolve("/no-existe", &User::anonymous()),
            Resolution::Render(Route::NotFound("/no-existe".to_string()))
        );
    }
}
