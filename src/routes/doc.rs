use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::{nutrition::Nutrition, planner::DietGoal},
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartItemDto, CartList},
        glue::{ChatReply, ChatRequest, CreatePaymentRequest, PaymentCreated},
        ingredients::{CreateIngredientRequest, IngredientList, UpdateIngredientRequest},
        logs::{ConsumedOrderItem, CreateMealRequest, DayLogView, UpdateMealRequest},
        menus::{ComponentSpec, CreateMenuRequest, MenuList, UpdateMenuRequest},
        orders::{CheckoutRequest, OrderList, OrderWithItems, PaymentRequested},
        plans::{DietPlanDto, GeneratePlanRequest},
        profile::UpdateProfileRequest,
        videos::{CreateVideoRequest, UpdateVideoRequest, VideoList},
    },
    models::{
        CartItem, DailyLog, DietPlan, FitnessVideo, Ingredient, MealEntry, MenuTemplate, Order,
        OrderItem, User, UserProfile,
    },
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, catalog, glue, health, logs, orders, params, plans, profile, videos},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        catalog::list_menus,
        catalog::get_menu,
        catalog::list_ingredients,
        videos::list_videos,
        videos::get_video,
        profile::get_profile,
        profile::update_profile,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        orders::list_orders,
        orders::checkout,
        orders::pay_order,
        orders::get_order,
        plans::generate_plan,
        plans::get_plan,
        logs::day_view,
        logs::add_meal,
        logs::update_meal,
        logs::delete_meal,
        admin::create_ingredient,
        admin::update_ingredient,
        admin::delete_ingredient,
        admin::create_menu,
        admin::update_menu,
        admin::delete_menu,
        admin::create_video,
        admin::update_video,
        admin::delete_video,
        admin::list_all_orders,
        admin::update_order_status,
        glue::create_payment,
        glue::chat
    ),
    components(
        schemas(
            User,
            UserProfile,
            Ingredient,
            MenuTemplate,
            FitnessVideo,
            CartItem,
            Order,
            OrderItem,
            DailyLog,
            MealEntry,
            DietPlan,
            Nutrition,
            DietGoal,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            AddToCartRequest,
            CartItemDto,
            CartList,
            CheckoutRequest,
            OrderWithItems,
            OrderList,
            PaymentRequested,
            CreateIngredientRequest,
            UpdateIngredientRequest,
            IngredientList,
            ComponentSpec,
            CreateMenuRequest,
            UpdateMenuRequest,
            MenuList,
            CreateVideoRequest,
            UpdateVideoRequest,
            VideoList,
            GeneratePlanRequest,
            DietPlanDto,
            CreateMealRequest,
            UpdateMealRequest,
            ConsumedOrderItem,
            DayLogView,
            UpdateProfileRequest,
            CreatePaymentRequest,
            PaymentCreated,
            ChatRequest,
            ChatReply,
            admin::UpdateOrderStatusRequest,
            params::Pagination,
            Meta,
            ApiResponse<MenuTemplate>,
            ApiResponse<MenuList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<DayLogView>,
            ApiResponse<DietPlanDto>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Catalog", description = "Menu and ingredient catalog endpoints"),
        (name = "Videos", description = "Fitness video endpoints"),
        (name = "Profile", description = "User profile endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Diet plans", description = "Daily diet plan endpoints"),
        (name = "Nutrition log", description = "Calorie tracking endpoints"),
        (name = "Admin", description = "Back-office endpoints"),
        (name = "Payments", description = "Invoice creation endpoints"),
        (name = "Chat", description = "Nutrition assistant endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
